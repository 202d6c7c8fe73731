//! Frontmatter metadata: parsed view, text codec and metadata mutations.
//!
//! # Responsibility
//! - Expose the leading `---` block as an ordered key -> value mapping.
//! - Provide the single authoritative accessors for `archived`, `pinned`
//!   and `priority` shared by the query engine, statistics and mutator.
//!
//! # Invariants
//! - Parsing never fails; malformed or unterminated blocks read as empty.
//! - `archived` is canonical. `status` is consulted only when `archived`
//!   is absent, as a read-only compatibility alias.
//! - `priority` always reads as an integer in `0..=5`; absent means 0.

mod codec;
pub mod mutator;

pub use codec::{parse, patch, strip_frontmatter, FrontmatterBuilder, DELIMITER};

use crate::model::document::{
    DocumentType, FIELD_ARCHIVED, FIELD_CONTEXT, FIELD_CREATED, FIELD_LINKS, FIELD_PINNED,
    FIELD_PRIORITY, FIELD_STATUS, FIELD_TYPE, MAX_PRIORITY, STATUS_ARCHIVED,
};

/// One frontmatter value: a scalar line or an indented `- item` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

/// Ordered frontmatter fields in file order.
///
/// Unknown keys are kept so callers can inspect them, but they are never
/// re-serialized from here; text mutations go through [`patch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: Vec<(String, FieldValue)>,
}

impl Frontmatter {
    /// Parses the leading block of `text`. See [`parse`].
    pub fn parse(text: &str) -> Self {
        parse(text)
    }

    pub(crate) fn from_fields(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Field keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    /// Scalar value for `key`; list values yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            FieldValue::Scalar(value) => Some(value.as_str()),
            FieldValue::List(_) => None,
        }
    }

    /// List items for `key`; a missing key or scalar yields an empty slice.
    pub fn get_list(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(FieldValue::List(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// `true`/`false` scalar, case-insensitive. Anything else is `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.get_str(key)?.trim();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get_str(key)?.trim().parse().ok()
    }

    /// Raw `type` value.
    pub fn type_name(&self) -> Option<&str> {
        self.get_str(FIELD_TYPE).filter(|value| !value.is_empty())
    }

    pub fn doc_type(&self) -> Option<DocumentType> {
        self.type_name().and_then(DocumentType::parse)
    }

    /// Non-empty `context` value.
    pub fn context(&self) -> Option<&str> {
        self.get_str(FIELD_CONTEXT).filter(|value| !value.is_empty())
    }

    /// Raw `created` value.
    pub fn created(&self) -> Option<&str> {
        self.get_str(FIELD_CREATED).filter(|value| !value.is_empty())
    }

    pub fn links(&self) -> &[String] {
        self.get_list(FIELD_LINKS)
    }

    /// Archived state: `archived` when parseable, else `status: archived`.
    pub fn is_archived(&self) -> bool {
        match self.get_bool(FIELD_ARCHIVED) {
            Some(archived) => archived,
            None => self
                .get_str(FIELD_STATUS)
                .is_some_and(|status| status.trim() == STATUS_ARCHIVED),
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.get_bool(FIELD_PINNED).unwrap_or(false)
    }

    /// Star rating clamped to `0..=5`.
    pub fn priority(&self) -> u8 {
        match self.get_int(FIELD_PRIORITY) {
            Some(value) => value.clamp(0, i64::from(MAX_PRIORITY)) as u8,
            None => 0,
        }
    }
}
