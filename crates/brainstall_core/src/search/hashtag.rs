//! Hashtag scanning.
//!
//! A hashtag is `#` followed by ASCII word characters, Hiragana, Katakana
//! or CJK unified ideographs. Results are case-folded.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#[A-Za-z0-9_\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{4E00}-\x{9FAF}]+")
        .expect("valid hashtag regex")
});

/// Hashtags in `text`, lowercased and deduplicated.
pub fn extract_hashtags(text: &str) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    collect_into(text, &mut tags);
    tags
}

/// Adds every hashtag of `text` to `tags`.
pub fn collect_into(text: &str, tags: &mut BTreeSet<String>) {
    for found in HASHTAG_RE.find_iter(text) {
        tags.insert(found.as_str().to_lowercase());
    }
}
