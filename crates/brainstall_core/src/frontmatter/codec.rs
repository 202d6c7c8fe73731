//! Line-oriented codec for the leading `---` block.
//!
//! # Responsibility
//! - Locate the block, parse its fields, strip it from the body.
//! - Patch one key in place and render new blocks for producers.
//!
//! # Invariants
//! - The block opens on the very first line and closes on the next line
//!   that is exactly `---`. Anything else is treated as plain body.
//! - `patch` keeps every byte outside the touched field line verbatim,
//!   including field order, blank lines and line endings.
//! - Re-applying the same `(key, value)` produces byte-identical output.

use super::{FieldValue, Frontmatter};
use once_cell::sync::Lazy;
use regex::Regex;

/// Opening and closing line of a frontmatter block.
pub const DELIMITER: &str = "---";

static KEY_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_-]+):[ \t]*(.*)$").expect("valid key line regex"));
static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]+-[ \t]*(.*)$").expect("valid list item regex"));

struct Line<'a> {
    start: usize,
    end: usize,
    content: &'a str,
}

struct BlockSpan {
    inner_start: usize,
    close_start: usize,
    close_end: usize,
}

impl BlockSpan {
    /// Line ending of the opening delimiter; always present.
    fn line_ending<'a>(&self, text: &'a str) -> &'a str {
        &text[DELIMITER.len()..self.inner_start]
    }
}

struct FieldRange<'a> {
    start: usize,
    end: usize,
    line_ending: &'a str,
}

/// Parses the leading block into ordered fields.
///
/// `key: value` lines become scalars with one pair of matching surrounding
/// quotes removed. A key with an empty value followed by indented `- item`
/// lines becomes a list. Returns an empty mapping when the block is missing
/// or unterminated.
pub fn parse(text: &str) -> Frontmatter {
    let Some(span) = locate_block(text) else {
        return Frontmatter::default();
    };

    let inner = &text[span.inner_start..span.close_start];
    let mut fields: Vec<(String, FieldValue)> = Vec::new();
    for line in lines(inner) {
        if let Some(caps) = LIST_ITEM_RE.captures(line.content) {
            let item = unquote(caps[1].trim()).to_string();
            if let Some((_, value)) = fields.last_mut() {
                if matches!(value, FieldValue::Scalar(scalar) if scalar.is_empty()) {
                    *value = FieldValue::List(Vec::new());
                }
                if let FieldValue::List(items) = value {
                    items.push(item);
                }
            }
            continue;
        }

        if let Some(caps) = KEY_LINE_RE.captures(line.content) {
            let scalar = unquote(caps[2].trim()).to_string();
            fields.push((caps[1].to_string(), FieldValue::Scalar(scalar)));
        }
    }

    Frontmatter::from_fields(fields)
}

/// Returns the body: everything after the closing delimiter, minus the one
/// blank separator line. Returns `text` unchanged when there is no block.
pub fn strip_frontmatter(text: &str) -> &str {
    match locate_block(text) {
        Some(span) => {
            let rest = &text[span.close_end..];
            rest.strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .unwrap_or(rest)
        }
        None => text,
    }
}

/// Sets `key: value` with a minimal diff.
///
/// - Existing key: only its line (and any list items under it) is replaced.
/// - Block without the key: one line is inserted right before the closing
///   delimiter.
/// - No block: a new block is prepended, followed by a blank line.
///
/// `value` is written as given; no escaping is applied.
pub fn patch(text: &str, key: &str, value: &str) -> String {
    let replacement = format!("{key}: {value}");
    let Some(span) = locate_block(text) else {
        return format!("{DELIMITER}\n{replacement}\n{DELIMITER}\n\n{text}");
    };

    let inner = &text[span.inner_start..span.close_start];
    let mut patched = String::with_capacity(text.len() + replacement.len() + 1);
    match find_field(inner, key) {
        Some(field) => {
            patched.push_str(&text[..span.inner_start + field.start]);
            patched.push_str(&replacement);
            patched.push_str(field.line_ending);
            patched.push_str(&text[span.inner_start + field.end..]);
        }
        None => {
            patched.push_str(&text[..span.close_start]);
            patched.push_str(&replacement);
            patched.push_str(span.line_ending(text));
            patched.push_str(&text[span.close_start..]);
        }
    }
    patched
}

/// Renders a fresh frontmatter block in the persisted document format.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterBuilder {
    lines: Vec<String>,
}

impl FrontmatterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key: value` verbatim.
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.lines.push(format!("{key}: {value}"));
        self
    }

    /// Adds `key: "value"`.
    pub fn quoted(mut self, key: &str, value: &str) -> Self {
        self.lines.push(format!("{key}: \"{value}\""));
        self
    }

    /// Adds `key:` followed by `  - "item"` lines. Skipped when empty.
    pub fn list(mut self, key: &str, items: &[String]) -> Self {
        if items.is_empty() {
            return self;
        }
        self.lines.push(format!("{key}:"));
        for item in items {
            self.lines.push(format!("  - \"{item}\""));
        }
        self
    }

    /// Renders the block, closing delimiter line included.
    pub fn render(&self) -> String {
        let mut out = String::from(DELIMITER);
        out.push('\n');
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }

    /// Renders the block, a blank line, then `body`.
    pub fn finish(self, body: &str) -> String {
        format!("{}\n{body}", self.render())
    }
}

fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        Line {
            start,
            end: offset,
            content,
        }
    })
}

fn locate_block(text: &str) -> Option<BlockSpan> {
    let mut iter = lines(text);
    let opening = iter.next()?;
    if opening.content != DELIMITER || opening.end == opening.content.len() {
        return None;
    }
    iter.find(|line| line.content == DELIMITER)
        .map(|closing| BlockSpan {
            inner_start: opening.end,
            close_start: closing.start,
            close_end: closing.end,
        })
}

fn find_field<'a>(inner: &'a str, key: &str) -> Option<FieldRange<'a>> {
    let mut iter = lines(inner).peekable();
    while let Some(line) = iter.next() {
        let is_target = KEY_LINE_RE
            .captures(line.content)
            .is_some_and(|caps| &caps[1] == key);
        if !is_target {
            continue;
        }

        let line_ending = &inner[line.start + line.content.len()..line.end];
        let mut end = line.end;
        while let Some(next) = iter.peek() {
            if !LIST_ITEM_RE.is_match(next.content) {
                break;
            }
            end = next.end;
            iter.next();
        }
        return Some(FieldRange {
            start: line.start,
            end,
            line_ending,
        });
    }
    None
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
