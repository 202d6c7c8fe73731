//! Idempotent metadata mutations built on [`patch`](super::patch).
//!
//! # Invariants
//! - Every mutation rewrites only the lines of the fields it names.
//! - Applying the same `(field, value)` twice yields byte-identical text.
//! - Archiving writes `archived` and the legacy `status` in one call.

use super::{patch, Frontmatter};
use crate::model::document::{
    FIELD_ARCHIVED, FIELD_PINNED, FIELD_STATUS, MAX_PRIORITY, STATUS_ACTIVE, STATUS_ARCHIVED,
};

/// Sets a boolean field to `true`/`false`.
///
/// For `archived` the legacy `status` field is set to `archived`/`active`
/// in the same call.
pub fn set_boolean_flag(text: &str, field: &str, value: bool) -> String {
    let patched = patch(text, field, if value { "true" } else { "false" });
    if field != FIELD_ARCHIVED {
        return patched;
    }
    let status = if value { STATUS_ARCHIVED } else { STATUS_ACTIVE };
    patch(&patched, FIELD_STATUS, status)
}

/// Writes a raw integer. Range validation is the caller's job.
pub fn set_integer_field(text: &str, field: &str, value: i64) -> String {
    patch(text, field, &value.to_string())
}

/// Flips `pinned` and returns the new text plus the new state.
pub fn toggle_pinned(text: &str) -> (String, bool) {
    let pinned = !Frontmatter::parse(text).is_pinned();
    (set_boolean_flag(text, FIELD_PINNED, pinned), pinned)
}

/// Priority after clicking star `clicked` (1-5) at current priority `current`.
///
/// Clicking the currently filled top star steps down by one; clicking any
/// other star jumps to it.
pub fn next_priority(current: u8, clicked: u8) -> u8 {
    let clicked = clicked.min(MAX_PRIORITY);
    if clicked == current {
        clicked.saturating_sub(1)
    } else {
        clicked
    }
}
