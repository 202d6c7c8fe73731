//! Directory-backed vault store.

use super::{parent_folder, validate_path, StoreError, StoreResult, VaultStore};
use log::{debug, error};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Vault rooted at one directory on disk.
///
/// Hidden entries (names starting with `.`) are skipped when listing.
/// Symbolic links are never followed.
#[derive(Debug, Clone)]
pub struct FsVaultStore {
    root: PathBuf,
}

impl FsVaultStore {
    /// Opens a vault directory, creating it when missing.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| {
            error!(
                "event=vault_open module=store status=error root={} error={}",
                root.display(),
                source
            );
            StoreError::Io {
                path: root.display().to_string(),
                source,
            }
        })?;
        debug!(
            "event=vault_open module=store status=ok root={}",
            root.display()
        );
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let path = validate_path(path)?;
        Ok(path.split('/').fold(self.root.clone(), |acc, segment| acc.join(segment)))
    }
}

impl VaultStore for FsVaultStore {
    fn exists(&self, path: &str) -> StoreResult<bool> {
        Ok(self.resolve(path)?.exists())
    }

    fn read(&self, path: &str) -> StoreResult<String> {
        let full = self.resolve(path)?;
        fs::read_to_string(&full).map_err(|err| map_io(path, err))
    }

    fn create(&self, path: &str, text: &str) -> StoreResult<()> {
        let full = self.resolve(path)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&full) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let parent = parent_folder(path).unwrap_or_default();
                return Err(StoreError::MissingFolder(parent.to_string()));
            }
            Err(err) => return Err(map_io(path, err)),
        };
        let written = file.write_all(text.as_bytes());
        drop(file);
        discard_on_failure(&full, path, written)
    }

    fn write(&self, path: &str, text: &str) -> StoreResult<()> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        fs::write(&full, text).map_err(|err| map_io(path, err))
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        let full = self.resolve(path)?;
        fs::remove_file(&full).map_err(|err| map_io(path, err))
    }

    fn create_folder(&self, path: &str) -> StoreResult<()> {
        let full = self.resolve(path)?;
        fs::create_dir_all(&full).map_err(|err| map_io(path, err))
    }

    fn list_files(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut files = collect_files(&self.root)?;
        files.retain(|path| path.starts_with(prefix));
        files.sort();
        Ok(files)
    }

    fn modified_at(&self, path: &str) -> StoreResult<SystemTime> {
        let full = self.resolve(path)?;
        fs::metadata(&full)
            .and_then(|meta| meta.modified())
            .map_err(|err| map_io(path, err))
    }
}

fn collect_files(root: &Path) -> StoreResult<Vec<String>> {
    let mut out = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| root.display().to_string());
            map_io(&path, err.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            let joined = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            out.push(joined);
        }
    }
    Ok(out)
}

/// Removes a just-created file whose content could not be fully written.
fn discard_on_failure(full: &Path, path: &str, written: std::io::Result<()>) -> StoreResult<()> {
    let Err(err) = written else {
        return Ok(());
    };
    if let Err(cleanup) = fs::remove_file(full) {
        error!(
            "event=store_create module=store status=error path={} cleanup_error={}",
            path, cleanup
        );
    }
    Err(map_io(path, err))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn map_io(path: &str, err: std::io::Error) -> StoreError {
    match err.kind() {
        ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
        ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
        _ => StoreError::Io {
            path: path.to_string(),
            source: err,
        },
    }
}
