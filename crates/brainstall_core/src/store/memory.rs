//! In-memory vault store for tests and dry runs.

use super::{parent_folder, validate_path, StoreError, StoreResult, VaultStore};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::time::SystemTime;

#[derive(Debug, Clone)]
struct MemoryFile {
    text: String,
    modified_at: SystemTime,
}

/// Vault held in ordered maps. Single-threaded by construction.
#[derive(Debug, Default)]
pub struct MemoryVaultStore {
    files: RefCell<BTreeMap<String, MemoryFile>>,
    folders: RefCell<BTreeSet<String>>,
}

impl MemoryVaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides a file's modification time.
    pub fn set_modified(&self, path: &str, modified_at: SystemTime) -> StoreResult<()> {
        let mut files = self.files.borrow_mut();
        let file = files
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        file.modified_at = modified_at;
        Ok(())
    }

    /// Known folders in ascending order.
    pub fn folders(&self) -> Vec<String> {
        self.folders.borrow().iter().cloned().collect()
    }
}

impl VaultStore for MemoryVaultStore {
    fn exists(&self, path: &str) -> StoreResult<bool> {
        let path = validate_path(path)?;
        Ok(self.files.borrow().contains_key(path) || self.folders.borrow().contains(path))
    }

    fn read(&self, path: &str) -> StoreResult<String> {
        let path = validate_path(path)?;
        self.files
            .borrow()
            .get(path)
            .map(|file| file.text.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn create(&self, path: &str, text: &str) -> StoreResult<()> {
        let path = validate_path(path)?;
        if let Some(parent) = parent_folder(path) {
            if !self.folders.borrow().contains(parent) {
                return Err(StoreError::MissingFolder(parent.to_string()));
            }
        }
        let mut files = self.files.borrow_mut();
        if files.contains_key(path) || self.folders.borrow().contains(path) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        files.insert(
            path.to_string(),
            MemoryFile {
                text: text.to_string(),
                modified_at: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn write(&self, path: &str, text: &str) -> StoreResult<()> {
        let path = validate_path(path)?;
        let mut files = self.files.borrow_mut();
        let file = files
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        file.text = text.to_string();
        file.modified_at = SystemTime::now();
        Ok(())
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        let path = validate_path(path)?;
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn create_folder(&self, path: &str) -> StoreResult<()> {
        let path = validate_path(path)?;
        let mut folders = self.folders.borrow_mut();
        let mut current = String::new();
        for segment in path.split('/') {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            folders.insert(current.clone());
        }
        Ok(())
    }

    fn list_files(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn modified_at(&self, path: &str) -> StoreResult<SystemTime> {
        let path = validate_path(path)?;
        self.files
            .borrow()
            .get(path)
            .map(|file| file.modified_at)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }
}
