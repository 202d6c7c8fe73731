//! Document read model and recognized metadata fields.
//!
//! # Responsibility
//! - Pair a vault path with its raw text and parsed frontmatter.
//! - Resolve the effective date used for sorting and bucketing.
//!
//! # Invariants
//! - `frontmatter` is always derived from `text`; the two never drift.
//! - Effective date resolution order: `created` field, path stamp,
//!   modification time.

use crate::frontmatter::{strip_frontmatter, Frontmatter};
use crate::model::time::{parse_created, parse_path_stamp};
use chrono::NaiveDateTime;
use std::fmt::{Display, Formatter};

pub const FIELD_TYPE: &str = "type";
pub const FIELD_CONTEXT: &str = "context";
pub const FIELD_CREATED: &str = "created";
pub const FIELD_LINKS: &str = "links";
pub const FIELD_ARCHIVED: &str = "archived";
/// Legacy alias of `archived`. Written alongside it, read only as fallback.
pub const FIELD_STATUS: &str = "status";
pub const FIELD_PINNED: &str = "pinned";
pub const FIELD_PRIORITY: &str = "priority";

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_ARCHIVED: &str = "archived";

/// Highest star rating a document can carry.
pub const MAX_PRIORITY: u8 = 5;

/// Markdown file extension used for every document.
pub const DOCUMENT_EXTENSION: &str = ".md";

/// Producer category stored in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// Manually captured short note.
    Memo,
    /// Generated checklist.
    Listify,
    /// Generated deep-dive summary.
    DeepDive,
    /// Free-form article.
    Article,
    /// Record of a topic being created or extended.
    TopicNotification,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memo => "memo",
            Self::Listify => "listify",
            Self::DeepDive => "deepDive",
            Self::Article => "article",
            Self::TopicNotification => "topic-notification",
        }
    }

    /// Parses a persisted `type` value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "memo" => Some(Self::Memo),
            "listify" => Some(Self::Listify),
            "deepDive" => Some(Self::DeepDive),
            "article" => Some(Self::Article),
            "topic-notification" => Some(Self::TopicNotification),
            _ => None,
        }
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which step of the fallback chain produced an effective date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Created,
    PathStamp,
    Modified,
}

/// One text document loaded from the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Slash-separated vault path, e.g. `Archives/Notifications/2025/.../x.md`.
    pub path: String,
    /// Full raw text including any frontmatter block.
    pub text: String,
    /// Last modification time in local wall-clock time.
    pub modified_at: NaiveDateTime,
    frontmatter: Frontmatter,
}

impl Document {
    /// Builds a document and parses its frontmatter.
    pub fn new(
        path: impl Into<String>,
        text: impl Into<String>,
        modified_at: NaiveDateTime,
    ) -> Self {
        let text = text.into();
        let frontmatter = Frontmatter::parse(&text);
        Self {
            path: path.into(),
            text,
            modified_at,
            frontmatter,
        }
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    /// Text after the frontmatter block (whole text when there is none).
    pub fn body(&self) -> &str {
        strip_frontmatter(&self.text)
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    /// Last path segment without the `.md` extension.
    pub fn base_name(&self) -> &str {
        base_name(&self.path)
    }

    /// Effective date used for sorting, filtering and bucketing.
    pub fn effective_date(&self) -> NaiveDateTime {
        self.resolve_effective_date().0
    }

    /// Effective date plus the fallback step that produced it.
    pub fn resolve_effective_date(&self) -> (NaiveDateTime, DateSource) {
        if let Some(created) = self.frontmatter.created().and_then(parse_created) {
            return (created, DateSource::Created);
        }
        if let Some(stamped) = parse_path_stamp(&self.path) {
            return (stamped, DateSource::PathStamp);
        }
        (self.modified_at, DateSource::Modified)
    }
}

/// Last segment of a slash-separated path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Last segment without the `.md` extension.
pub fn base_name(path: &str) -> &str {
    let name = file_name(path);
    name.strip_suffix(DOCUMENT_EXTENSION).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::{base_name, DateSource, Document, DocumentType};
    use chrono::NaiveDate;

    fn epoch() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn type_round_trips_through_persisted_names() {
        for kind in [
            DocumentType::Memo,
            DocumentType::Listify,
            DocumentType::DeepDive,
            DocumentType::Article,
            DocumentType::TopicNotification,
        ] {
            assert_eq!(DocumentType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentType::parse("deepdive"), None);
    }

    #[test]
    fn base_name_strips_folder_and_extension() {
        assert_eq!(base_name("Topics/Plan A.md"), "Plan A");
        assert_eq!(base_name("README"), "README");
    }

    #[test]
    fn effective_date_falls_back_through_the_chain() {
        let created = Document::new(
            "A/20240102_030405_memo.md",
            "---\ncreated: \"2025-03-29T08:02:00.000+09:00\"\n---\n\nx",
            epoch(),
        );
        assert_eq!(created.resolve_effective_date().1, DateSource::Created);

        let stamped = Document::new("A/20240102_030405_memo.md", "no metadata", epoch());
        let (date, source) = stamped.resolve_effective_date();
        assert_eq!(source, DateSource::PathStamp);
        assert_eq!(date.to_string(), "2024-01-02 03:04:05");

        let bare = Document::new("A/note.md", "---\ncreated: soon\n---\n", epoch());
        assert_eq!(bare.resolve_effective_date(), (epoch(), DateSource::Modified));
    }
}
