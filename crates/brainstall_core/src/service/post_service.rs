//! Per-document user actions.
//!
//! # Responsibility
//! - Archive/unarchive, pin, star, delete and share one document.
//!
//! # Invariants
//! - Every mutation is a read-modify-write of a single document through the
//!   metadata mutator; the body is never rewritten.
//! - A mutation that would not change the text performs no write.

use crate::frontmatter::mutator::{next_priority, set_boolean_flag, set_integer_field, toggle_pinned};
use crate::model::document::{Document, FIELD_ARCHIVED, FIELD_PRIORITY, MAX_PRIORITY};
use crate::repo::document_repo::{DocumentRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for post actions.
#[derive(Debug)]
pub enum PostError {
    /// Target document does not exist.
    NotFound(String),
    /// Star index outside `1..=5`.
    InvalidStar(u8),
    Repo(RepoError),
}

impl Display for PostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "document not found: {path}"),
            Self::InvalidStar(index) => {
                write!(f, "star index must be 1..={MAX_PRIORITY}, got {index}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PostError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(path) => Self::NotFound(path),
            other => Self::Repo(other),
        }
    }
}

/// Post action facade over repository implementations.
pub struct PostService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Sets `archived: true` (and `status: archived`).
    pub fn archive(&self, path: &str) -> Result<(), PostError> {
        self.set_archived(path, true)
    }

    /// Sets `archived: false` (and `status: active`).
    pub fn unarchive(&self, path: &str) -> Result<(), PostError> {
        self.set_archived(path, false)
    }

    /// Flips `pinned` and returns the new state.
    pub fn toggle_pin(&self, path: &str) -> Result<bool, PostError> {
        let document = self.repo.read(path)?;
        let (text, pinned) = toggle_pinned(&document.text);
        self.write_if_changed(&document, &text)?;
        info!(
            "event=post_pin module=post status=ok path={} pinned={}",
            path, pinned
        );
        Ok(pinned)
    }

    /// Applies the star-click rule for `index` and returns the new priority.
    pub fn click_star(&self, path: &str, index: u8) -> Result<u8, PostError> {
        if !(1..=MAX_PRIORITY).contains(&index) {
            return Err(PostError::InvalidStar(index));
        }
        let document = self.repo.read(path)?;
        let priority = next_priority(document.frontmatter().priority(), index);
        let text = set_integer_field(&document.text, FIELD_PRIORITY, i64::from(priority));
        self.write_if_changed(&document, &text)?;
        info!(
            "event=post_star module=post status=ok path={} priority={}",
            path, priority
        );
        Ok(priority)
    }

    /// Hard-deletes the document.
    pub fn delete(&self, path: &str) -> Result<(), PostError> {
        self.repo.delete(path)?;
        Ok(())
    }

    /// Clipboard payload: `[[name]]`, a blank line, then the trimmed body.
    pub fn share_text(&self, path: &str) -> Result<String, PostError> {
        let document = self.repo.read(path)?;
        Ok(format!(
            "[[{}]]\n\n{}",
            document.base_name(),
            document.body().trim()
        ))
    }

    fn set_archived(&self, path: &str, archived: bool) -> Result<(), PostError> {
        let document = self.repo.read(path)?;
        let text = set_boolean_flag(&document.text, FIELD_ARCHIVED, archived);
        self.write_if_changed(&document, &text)?;
        info!(
            "event=post_archive module=post status=ok path={} archived={}",
            path, archived
        );
        Ok(())
    }

    fn write_if_changed(&self, document: &Document, text: &str) -> Result<(), PostError> {
        if document.text != text {
            self.repo.modify(&document.path, text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PostError, PostService};
    use crate::repo::document_repo::{DocumentRepository, VaultDocumentRepository};
    use crate::store::MemoryVaultStore;

    #[test]
    fn invalid_star_is_rejected_before_reading() {
        let store = MemoryVaultStore::new();
        let service = PostService::new(VaultDocumentRepository::new(&store));
        assert!(matches!(
            service.click_star("missing.md", 0),
            Err(PostError::InvalidStar(0))
        ));
        assert!(matches!(
            service.click_star("missing.md", 6),
            Err(PostError::InvalidStar(6))
        ));
        assert!(matches!(
            service.click_star("missing.md", 3),
            Err(PostError::NotFound(_))
        ));
    }

    #[test]
    fn share_text_links_base_name_and_strips_metadata() {
        let store = MemoryVaultStore::new();
        let repo = VaultDocumentRepository::new(&store);
        repo.create("idea.md", "---\ntype: memo\n---\n\n  hello world \n")
            .unwrap();
        let service = PostService::new(repo);
        assert_eq!(service.share_text("idea.md").unwrap(), "[[idea]]\n\nhello world");
    }
}
