//! Per-process session context.
//!
//! Built once at startup and handed to whatever needs a store, instead of
//! module-level singletons.

use super::dict::PersistedDict;
use crate::config::{paths, ValueStore};
use crate::error::ApiError;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Shared handle to a persisted store.
pub type SharedDict = Arc<RwLock<PersistedDict>>;

pub const ACCOUNT_FILE: &str = "profile.json";
pub const CONFIG_FILE: &str = "cli.json";
pub const SESSION_FILE: &str = "cli.sess";
pub const COMMAND_CACHE_FILE: &str = "commandIndex.csv";

/// Session entries older than this are discarded on load.
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(3600);

/// The stores of one CLI process.
pub struct SessionContext {
    config_dir: PathBuf,
    values: Arc<ValueStore>,
    account: SharedDict,
    config: SharedDict,
    session: SharedDict,
}

impl SessionContext {
    /// Open every store under `config_dir`, creating the directory if needed.
    pub fn open(config_dir: &Path, values: ValueStore) -> Result<Self, ApiError> {
        paths::ensure_dir(config_dir)?;

        let open = |name: &str, max_age: Option<Duration>| -> SharedDict {
            Arc::new(RwLock::new(PersistedDict::open(config_dir.join(name), max_age)))
        };

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            values: Arc::new(values),
            account: open(ACCOUNT_FILE, None),
            config: open(CONFIG_FILE, None),
            session: open(SESSION_FILE, Some(SESSION_MAX_AGE)),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn values(&self) -> Arc<ValueStore> {
        Arc::clone(&self.values)
    }

    /// Account and subscription metadata.
    pub fn account(&self) -> SharedDict {
        Arc::clone(&self.account)
    }

    /// CLI-managed settings.
    pub fn config(&self) -> SharedDict {
        Arc::clone(&self.config)
    }

    /// Short-lived state, reset after [`SESSION_MAX_AGE`].
    pub fn session(&self) -> SharedDict {
        Arc::clone(&self.session)
    }

    /// Location of the command resolution cache.
    pub fn command_cache_path(&self) -> PathBuf {
        self.config_dir.join(COMMAND_CACHE_FILE)
    }
}
