//! CommandResolutionCache: the persisted command name -> module map.
//!
//! File format, one record per line, no escaping:
//!
//! ```text
//! vm create,vm
//! storage account show,storage
//! ```
//!
//! The file is written once, wholesale, after a full load and never edited in
//! place. A missing or unreadable file simply means the cache is cold.

use super::argv::{leading_positionals, longest_known_prefix};
use super::registry::{short_module_name, CommandTable, GroupTable, ModuleRegistry};
use crate::config::{ValueStore, CORE_SECTION, USE_COMMAND_CACHE};
use crate::error::{LoadError, StorageError};
use crate::session::atomic::write_atomic;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of [`CommandResolutionCache::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No cache file, or caching disabled. A full load is required.
    Cold,
    /// The cache does not know the invoked command. A full load is required.
    Unresolved,
    /// Exactly one module was loaded and merged.
    Resolved {
        command: String,
        module: String,
        elapsed: Duration,
    },
}

/// A cache answer that has not been acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    pub command: String,
    pub module: String,
}

/// Command resolution cache bound to one file.
#[derive(Debug, Clone)]
pub struct CommandResolutionCache {
    path: PathBuf,
    enabled: bool,
}

impl CommandResolutionCache {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled,
        }
    }

    /// Read the `core.use_command_cache` switch (off unless set).
    ///
    /// An unparseable switch disables the cache rather than failing the command.
    pub fn from_config(path: impl Into<PathBuf>, values: &ValueStore) -> Self {
        let enabled = match values.get_bool(CORE_SECTION, USE_COMMAND_CACHE, Some(false)) {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::warn!(error = %e, "command cache disabled");
                false
            }
        };
        Self::new(path, enabled)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True when the cache file is present and caching is enabled.
    pub fn exists(&self) -> bool {
        self.enabled && self.path.is_file()
    }

    /// Parsed cache file. `None` when the file is missing or unreadable.
    ///
    /// Lines without a comma are skipped; a repeated command keeps its first
    /// module.
    pub fn entries(&self) -> Option<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "command cache unavailable");
                return None;
            }
        };

        let mut entries = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((command, module)) = line.split_once(',') else {
                tracing::debug!(line, "skipping malformed command cache line");
                continue;
            };
            let (command, module) = (command.trim(), module.trim());
            if command.is_empty() || module.is_empty() {
                continue;
            }
            if entries.contains_key(command) {
                tracing::warn!(command, "duplicate command in cache, keeping first entry");
                continue;
            }
            entries.insert(command.to_string(), module.to_string());
        }
        Some(entries)
    }

    /// Write `commands` (command name -> dotted module path) to `path`.
    ///
    /// No-op when the file already exists. Returns whether a file was written.
    pub fn persist(
        commands: &BTreeMap<String, String>,
        path: &Path,
    ) -> Result<bool, StorageError> {
        if path.exists() {
            return Ok(false);
        }

        let mut content = String::new();
        for (command, module) in commands {
            content.push_str(command);
            content.push(',');
            content.push_str(short_module_name(module));
            content.push('\n');
        }
        write_atomic(path, content.as_bytes())?;
        tracing::info!(path = %path.display(), commands = commands.len(), "command cache written");
        Ok(true)
    }

    /// Delete the cache file. Returns whether a file was removed.
    pub fn invalidate(&self) -> Result<bool, StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    /// Which module would serve `argv`, without loading anything.
    ///
    /// Works whether or not caching is enabled.
    pub fn lookup<S: AsRef<str>>(&self, argv: &[S]) -> Option<CacheHit> {
        let entries = self.entries()?;
        Self::find(&entries, argv)
    }

    /// Load only the module owning the invoked command and merge its tables.
    ///
    /// A module the cache names but the registry cannot import is an
    /// installation defect and is returned as an error.
    pub fn resolve<S, R>(
        &self,
        argv: &[S],
        registry: &R,
        commands: &mut CommandTable,
        groups: &mut GroupTable,
    ) -> Result<Resolution, LoadError>
    where
        S: AsRef<str>,
        R: ModuleRegistry + ?Sized,
    {
        if !self.exists() {
            return Ok(Resolution::Cold);
        }
        let Some(entries) = self.entries() else {
            return Ok(Resolution::Cold);
        };
        let Some(hit) = Self::find(&entries, argv) else {
            tracing::debug!("command not found in cache");
            return Ok(Resolution::Unresolved);
        };

        let started = Instant::now();
        let contributions = registry.load(&hit.module)?;
        contributions.merge_into(commands, groups);
        let elapsed = started.elapsed();

        tracing::debug!(
            command = %hit.command,
            module = %hit.module,
            elapsed_ms = elapsed.as_millis() as u64,
            "resolved command from cache"
        );
        Ok(Resolution::Resolved {
            command: hit.command,
            module: hit.module,
            elapsed,
        })
    }

    fn find<S: AsRef<str>>(entries: &BTreeMap<String, String>, argv: &[S]) -> Option<CacheHit> {
        let words = leading_positionals(argv);
        let command = longest_known_prefix(&words, |candidate| entries.contains_key(candidate))?;
        let module = entries.get(&command)?.clone();
        Some(CacheHit { command, module })
    }
}
