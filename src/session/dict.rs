//! PersistedDict: an ordered JSON object kept in memory and mirrored to disk.

use super::atomic::write_atomic;
use crate::error::StorageError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Attempts made by mutating operations before a write failure is given up.
pub const DEFAULT_SAVE_RETRIES: u32 = 5;

/// Pause between two save attempts.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// JSON-file-backed map for session-scoped, best-effort state.
///
/// Reads never touch the disk. Every `set`/`delete` writes the full map back
/// before returning; if every retry fails the in-memory map stays
/// authoritative for the rest of the process. There is no cross-process
/// locking: the last writer wins.
#[derive(Debug, Default)]
pub struct PersistedDict {
    path: Option<PathBuf>,
    data: Map<String, Value>,
}

impl PersistedDict {
    /// A dict without a backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Construct and [`load`](Self::load) in one step.
    pub fn open(path: impl Into<PathBuf>, max_age: Option<Duration>) -> Self {
        let mut dict = Self::default();
        dict.load(path, max_age);
        dict
    }

    /// Reset to empty and read `path`.
    ///
    /// A file older than `max_age` is expired: it is overwritten with `{}`
    /// before anything is read. A missing, unreadable or malformed file is
    /// replaced by `{}` as well. None of this is reported to the caller.
    pub fn load(&mut self, path: impl Into<PathBuf>, max_age: Option<Duration>) {
        let path = path.into();
        self.data = Map::new();
        self.path = Some(path.clone());

        if let Some(max_age) = max_age.filter(|age| !age.is_zero()) {
            if is_older_than(&path, max_age) {
                tracing::debug!(path = %path.display(), "session file expired, resetting");
                self.heal();
                return;
            }
        }

        match read_object(&path) {
            Ok(data) => self.data = data,
            Err(e) => {
                if path.is_file() {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to load session file, resetting to defaults"
                    );
                }
                self.heal();
            }
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Insert or replace `key`, then flush.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
        self.flush();
    }

    /// Remove `key`, then flush. Returns the removed value.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        let removed = self.data.shift_remove(key);
        self.flush();
        removed
    }

    /// Try [`save`](Self::save) up to `retries` times (at least once),
    /// sleeping between attempts. Only the last failure is returned.
    pub fn save_with_retry(&self, retries: u32) -> Result<(), StorageError> {
        with_retries(retries, || self.save())
    }

    /// Write the whole map to the backing file in one shot.
    pub fn save(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_vec_pretty(&self.data)?;
        write_atomic(path, &content)
    }

    fn flush(&self) {
        if let Err(e) = self.save_with_retry(DEFAULT_SAVE_RETRIES) {
            tracing::warn!(error = %e, "failed to persist session state, keeping it in memory");
        }
    }

    fn heal(&self) {
        if let Err(e) = self.save() {
            tracing::debug!(error = %e, "could not reset session file");
        }
    }
}

fn with_retries<F>(retries: u32, mut attempt: F) -> Result<(), StorageError>
where
    F: FnMut() -> Result<(), StorageError>,
{
    for n in 1..retries {
        match attempt() {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::debug!(attempt = n, error = %e, "session save failed, retrying");
                std::thread::sleep(RETRY_BACKOFF);
            }
        }
    }
    attempt()
}

fn read_object(path: &Path) -> Result<Map<String, Value>, StorageError> {
    let content = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    let content = content.trim_start_matches('\u{feff}');
    Ok(serde_json::from_str(content)?)
}

fn is_older_than(path: &Path, max_age: Duration) -> bool {
    let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(_) => return false,
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age > max_age)
        .unwrap_or(false)
}
