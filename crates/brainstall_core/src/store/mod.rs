//! Vault storage contract and backends.
//!
//! # Responsibility
//! - Define the minimal file-storage contract the core depends on.
//! - Provide a directory-backed store and an in-memory store.
//! - Resolve date-partitioned folder paths.
//!
//! # Invariants
//! - Paths are slash-separated, relative to the vault root, and never
//!   contain `.`/`..` segments.
//! - `create` never overwrites; `write` never creates.
//! - `list_files` returns paths in ascending lexical order.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::SystemTime;

mod fs;
mod memory;
pub mod path;

pub use fs::FsVaultStore;
pub use memory::MemoryVaultStore;
pub use path::{ensure_folder_chain, resolve_date_folder};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level failure.
#[derive(Debug)]
pub enum StoreError {
    /// No file at the given path.
    NotFound(String),
    /// `create` target is already occupied.
    AlreadyExists(String),
    /// Parent folder of a new file does not exist.
    MissingFolder(String),
    /// Path is empty, absolute or escapes the vault.
    InvalidPath(String),
    /// Any other I/O failure.
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file not found: {path}"),
            Self::AlreadyExists(path) => write!(f, "file already exists: {path}"),
            Self::MissingFolder(path) => write!(f, "folder does not exist: {path}"),
            Self::InvalidPath(path) => write!(f, "invalid vault path: `{path}`"),
            Self::Io { path, source } => write!(f, "i/o failure on {path}: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound(_) => None,
            Self::AlreadyExists(_) => None,
            Self::MissingFolder(_) => None,
            Self::InvalidPath(_) => None,
        }
    }
}

/// UTF-8 text storage addressed by slash-separated paths.
pub trait VaultStore {
    /// Whether a file or folder exists at `path`.
    fn exists(&self, path: &str) -> StoreResult<bool>;
    /// Reads a whole file.
    fn read(&self, path: &str) -> StoreResult<String>;
    /// Creates a new file; fails with `AlreadyExists` when occupied.
    fn create(&self, path: &str, text: &str) -> StoreResult<()>;
    /// Overwrites an existing file; fails with `NotFound` when missing.
    fn write(&self, path: &str, text: &str) -> StoreResult<()>;
    /// Removes a file.
    fn delete(&self, path: &str) -> StoreResult<()>;
    /// Creates a folder and any missing ancestors. Existing folders are fine.
    fn create_folder(&self, path: &str) -> StoreResult<()>;
    /// Every file path starting with `prefix` (empty prefix lists all).
    fn list_files(&self, prefix: &str) -> StoreResult<Vec<String>>;
    /// Last modification time of a file.
    fn modified_at(&self, path: &str) -> StoreResult<SystemTime>;
}

/// Validates a vault-relative path.
pub(crate) fn validate_path(path: &str) -> StoreResult<&str> {
    let first_segment = path.split('/').next().unwrap_or_default();
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || first_segment.ends_with(':')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(path)
}

/// Parent folder of a path, `None` for top-level entries.
pub(crate) fn parent_folder(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

#[cfg(test)]
mod tests {
    use super::{parent_folder, validate_path};

    #[test]
    fn validate_path_rejects_escapes_and_absolutes() {
        assert!(validate_path("Topics/Plan A.md").is_ok());
        assert!(validate_path("").is_err());
        assert!(validate_path("/etc/passwd").is_err());
        assert!(validate_path("Topics/../secret.md").is_err());
        assert!(validate_path("Topics//x.md").is_err());
        assert!(validate_path("C:/x.md").is_err());
        assert!(validate_path("a\\b.md").is_err());
    }

    #[test]
    fn parent_folder_splits_last_segment() {
        assert_eq!(parent_folder("a/b/c.md"), Some("a/b"));
        assert_eq!(parent_folder("c.md"), None);
    }
}
