//! Wikilink token handling (`[[name]]`, `[[display|name]]`).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static WIKILINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("valid wikilink regex"));

/// Returns link targets in order of appearance, duplicates included.
///
/// For the pipe form the target is the last segment.
pub fn link_targets(text: &str) -> Vec<String> {
    WIKILINK_RE
        .captures_iter(text)
        .map(|caps| target_segment(&caps[1]).to_string())
        .collect()
}

/// Replaces each wikilink with its display part (first pipe segment).
pub fn replace_with_display(text: &str) -> String {
    WIKILINK_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let inner = &caps[1];
            inner.split('|').next().unwrap_or(inner).to_string()
        })
        .into_owned()
}

/// Replaces each wikilink with its target (last pipe segment).
pub fn replace_with_target(text: &str) -> String {
    WIKILINK_RE
        .replace_all(text, |caps: &Captures<'_>| target_segment(&caps[1]).to_string())
        .into_owned()
}

/// Renders one link token.
pub fn format_link(target: &str) -> String {
    format!("[[{target}]]")
}

fn target_segment(inner: &str) -> &str {
    inner.rsplit('|').next().unwrap_or(inner)
}

#[cfg(test)]
mod tests {
    use super::{link_targets, replace_with_display, replace_with_target};

    #[test]
    fn pipe_form_uses_last_segment_as_target() {
        assert_eq!(
            link_targets("see [[Shown|Real Note]] and [[Other]]"),
            vec!["Real Note".to_string(), "Other".to_string()]
        );
    }

    #[test]
    fn display_and_target_replacement_differ_for_pipe_form() {
        let text = "plan [[Shown|Real]] now";
        assert_eq!(replace_with_display(text), "plan Shown now");
        assert_eq!(replace_with_target(text), "plan Real now");
    }
}
