//! Date-partitioned folder paths.
//!
//! # Invariants
//! - `resolve_date_folder` is pure: `base/YYYY/YYYY-MM/YYYY-MM-DD`.
//! - `ensure_folder_chain` only creates missing segments and tolerates any
//!   amount of pre-existing structure.

use super::{StoreResult, VaultStore};
use chrono::NaiveDateTime;

/// Returns `base/YYYY/YYYY-MM/YYYY-MM-DD` for `at`.
pub fn resolve_date_folder(base: &str, at: NaiveDateTime) -> String {
    let base = base.trim_end_matches('/');
    format!(
        "{base}/{}/{}/{}",
        at.format("%Y"),
        at.format("%Y-%m"),
        at.format("%Y-%m-%d")
    )
}

/// Creates each segment of `folder` that does not exist yet.
pub fn ensure_folder_chain<S: VaultStore + ?Sized>(store: &S, folder: &str) -> StoreResult<()> {
    if store.exists(folder)? {
        return Ok(());
    }

    let mut current = String::new();
    for segment in folder.split('/').filter(|segment| !segment.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        if !store.exists(&current)? {
            store.create_folder(&current)?;
        }
    }
    Ok(())
}
