//! Document repository contract and vault-backed implementation.
//!
//! # Responsibility
//! - CRUD over the hierarchical text-file namespace.
//! - Prefix listing, folder-chain creation and wikilink target lookup.
//!
//! # Invariants
//! - `list_by_prefix(folder)` only returns paths under `folder/`.
//! - Documents are re-read from storage on every call; nothing is cached.

use crate::model::document::{base_name, file_name, Document, DOCUMENT_EXTENSION};
use crate::model::time::system_time_to_local;
use crate::store::{ensure_folder_chain, StoreError, StoreResult, VaultStore};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document persistence and lookup.
#[derive(Debug)]
pub enum RepoError {
    /// Target document does not exist (or vanished).
    NotFound(String),
    /// Creation target is already occupied.
    AlreadyExists(String),
    /// Any other storage failure.
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "document not found: {path}"),
            Self::AlreadyExists(path) => write!(f, "document already exists: {path}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
            Self::AlreadyExists(_) => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(path) => Self::NotFound(path),
            StoreError::AlreadyExists(path) => Self::AlreadyExists(path),
            other => Self::Store(other),
        }
    }
}

/// Repository interface for document operations.
pub trait DocumentRepository {
    /// Creates one document; fails with `AlreadyExists` when occupied.
    fn create(&self, path: &str, text: &str) -> RepoResult<()>;
    /// Reads and parses one document.
    fn read(&self, path: &str) -> RepoResult<Document>;
    /// Overwrites one existing document.
    fn modify(&self, path: &str, text: &str) -> RepoResult<()>;
    /// Hard-deletes one document.
    fn delete(&self, path: &str) -> RepoResult<()>;
    fn exists(&self, path: &str) -> RepoResult<bool>;
    /// Paths of every document under `folder/`, in enumeration order.
    fn list_by_prefix(&self, folder: &str) -> RepoResult<Vec<String>>;
    /// Paths of every document in the vault.
    fn list_all(&self) -> RepoResult<Vec<String>>;
    /// Creates any missing segment of `folder`.
    fn ensure_folder(&self, folder: &str) -> RepoResult<()>;

    /// Reads every document under `folder/`, skipping unreadable ones.
    fn load_under(&self, folder: &str) -> RepoResult<Vec<Document>> {
        let paths = self.list_by_prefix(folder)?;
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match self.read(&path) {
                Ok(document) => documents.push(document),
                Err(err) => warn!(
                    "event=document_skip module=repo status=error path={} error={}",
                    path, err
                ),
            }
        }
        Ok(documents)
    }

    /// Finds the markdown document a wikilink target points at.
    ///
    /// Matches on base name (`Plan A`) or file name (`Plan A.md`).
    fn resolve_link(&self, target: &str) -> RepoResult<Option<String>> {
        let target = target.trim();
        if target.is_empty() {
            return Ok(None);
        }
        Ok(self.list_all()?.into_iter().find(|path| {
            path.ends_with(DOCUMENT_EXTENSION)
                && (base_name(path) == target || file_name(path) == target)
        }))
    }

    /// First unoccupied `folder/stem.md`, then `folder/stem-1.md`, ...
    fn free_path(&self, folder: &str, stem: &str) -> RepoResult<String> {
        let candidate = format!("{folder}/{stem}{DOCUMENT_EXTENSION}");
        if !self.exists(&candidate)? {
            return Ok(candidate);
        }
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{folder}/{stem}-{suffix}{DOCUMENT_EXTENSION}");
            if !self.exists(&candidate)? {
                return Ok(candidate);
            }
            suffix += 1;
        }
    }
}

/// Repository backed by any [`VaultStore`].
pub struct VaultDocumentRepository<'store, S: VaultStore + ?Sized> {
    store: &'store S,
}

impl<'store, S: VaultStore + ?Sized> VaultDocumentRepository<'store, S> {
    pub fn new(store: &'store S) -> Self {
        Self { store }
    }
}

impl<S: VaultStore + ?Sized> Clone for VaultDocumentRepository<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: VaultStore + ?Sized> Copy for VaultDocumentRepository<'_, S> {}

impl<S: VaultStore + ?Sized> DocumentRepository for VaultDocumentRepository<'_, S> {
    fn create(&self, path: &str, text: &str) -> RepoResult<()> {
        logged_write("document_create", path, self.store.create(path, text))
    }

    fn read(&self, path: &str) -> RepoResult<Document> {
        let text = self.store.read(path)?;
        let modified_at = system_time_to_local(self.store.modified_at(path)?);
        Ok(Document::new(path, text, modified_at))
    }

    fn modify(&self, path: &str, text: &str) -> RepoResult<()> {
        logged_write("document_modify", path, self.store.write(path, text))
    }

    fn delete(&self, path: &str) -> RepoResult<()> {
        logged_write("document_delete", path, self.store.delete(path))
    }

    fn exists(&self, path: &str) -> RepoResult<bool> {
        Ok(self.store.exists(path)?)
    }

    fn list_by_prefix(&self, folder: &str) -> RepoResult<Vec<String>> {
        let folder = folder.trim_end_matches('/');
        if folder.is_empty() {
            return self.list_all();
        }
        Ok(self.store.list_files(&format!("{folder}/"))?)
    }

    fn list_all(&self) -> RepoResult<Vec<String>> {
        Ok(self.store.list_files("")?)
    }

    fn ensure_folder(&self, folder: &str) -> RepoResult<()> {
        logged_write("folder_ensure", folder, ensure_folder_chain(self.store, folder))
    }
}

fn logged_write<T>(event: &str, path: &str, result: StoreResult<T>) -> RepoResult<T> {
    match result {
        Ok(value) => {
            info!("event={} module=repo status=ok path={}", event, path);
            Ok(value)
        }
        Err(err) => {
            error!(
                "event={} module=repo status=error path={} error={}",
                event, path, err
            );
            Err(err.into())
        }
    }
}
