use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::StateError;

pub const STATE_EXTENSION: &str = "tfstate";

// Terraform's working directory keeps backend bookkeeping in `.tfstate` files.
const SKIP_DIRS: &[&str] = &[".terraform"];

/// All `*.tfstate` files under `root`, in sorted path order.
pub fn find_state_files(root: &Path) -> Result<Vec<PathBuf>, StateError> {
    fs::metadata(root).map_err(|source| StateError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry?;
        // `Path::is_file` follows symlinks; walkdir's file type does not.
        if is_state_file(entry.path()) && entry.path().is_file() {
            tracing::debug!(path = %entry.path().display(), "found state file");
            candidates.push(entry.into_path());
        }
    }

    candidates.sort();
    Ok(candidates)
}

/// The single state file under `root`.
///
/// Fails with `StateNotFound` when there is none and `AmbiguousState` when
/// there is more than one.
pub fn locate_state_file(root: &Path) -> Result<PathBuf, StateError> {
    let mut candidates = find_state_files(root)?;
    match candidates.len() {
        0 => Err(StateError::StateNotFound {
            root: root.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(StateError::AmbiguousState {
            root: root.to_path_buf(),
            candidates,
        }),
    }
}

fn is_state_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == STATE_EXTENSION)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}
