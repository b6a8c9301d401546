//! Atomic write primitives
//!
//! Uses temp→rename so no reader ever sees a partial file.

use crate::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// Atomically replace `target_path` with `content`.
///
/// The temp file lives next to the target and carries the process id, so two
/// processes writing the same file never share a temp file. Last writer wins.
pub fn write_atomic(target_path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
    }

    let temp_path = temp_path_for(target_path);
    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::io(&temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::io(target_path, e));
    }

    Ok(())
}

fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    target_path.with_file_name(name)
}
