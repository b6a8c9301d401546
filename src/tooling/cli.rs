//! CLI Tooling
//!
//! Diagnostics for the pieces a modular CLI relies on at startup: which
//! module the cache maps an invocation to, what the layered configuration
//! resolves to, and what the session stores hold.

use crate::config::{paths, ValueStore, DEFAULT_ENV_PREFIX};
use crate::error::ApiError;
use crate::resolve::CommandResolutionCache;
use crate::session::{SessionContext, SharedDict};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::PathBuf;

/// cmdroute - command resolution cache and session store tooling
#[derive(Parser)]
#[command(name = "cmdroute")]
#[command(about = "Inspect the command resolution cache, layered configuration and session stores")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration directory (overrides CMDROUTE_CONFIG_DIR)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Read layered configuration values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Read and edit the persisted session stores
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Inspect or clear the command resolution cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print one value (environment overrides files)
    Get { section: String, option: String },
    /// List a section, or every section
    List { section: Option<String> },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommands {
    /// Print a whole store as JSON
    Show { store: StoreName },
    /// Print one key
    Get { store: StoreName, key: String },
    /// Set a key; the value is parsed as JSON, or stored as a string
    Set {
        store: StoreName,
        key: String,
        value: String,
    },
    /// Remove a key
    Delete { store: StoreName, key: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheCommands {
    /// Show cache location, state and entries
    Show,
    /// Show which module would serve an invocation
    Lookup {
        /// Invocation words, e.g. `storage account show -g rg1`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        argv: Vec<String>,
    },
    /// Delete the cache file; the next full load rebuilds it
    Clear,
}

/// Persisted stores addressable from the CLI.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreName {
    Account,
    Config,
    Session,
}

/// Process-wide state for one CLI invocation.
pub struct CliContext {
    session: SessionContext,
    cache: CommandResolutionCache,
}

impl CliContext {
    /// Create a new CLI context rooted at `config_dir` (or the default directory).
    ///
    /// `on_values` sees the loaded configuration before any session store is
    /// opened, so logging installed there captures store recovery warnings.
    pub fn new<F>(config_dir: Option<PathBuf>, on_values: F) -> Result<Self, ApiError>
    where
        F: FnOnce(&ValueStore),
    {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => paths::config_dir()?,
        };
        let values = ValueStore::load(DEFAULT_ENV_PREFIX, &config_dir)?;
        on_values(&values);
        Self::from_parts(&config_dir, values)
    }

    /// Create a context from an already loaded value store.
    pub fn from_parts(config_dir: &std::path::Path, values: ValueStore) -> Result<Self, ApiError> {
        let session = SessionContext::open(config_dir, values)?;
        let cache = CommandResolutionCache::from_config(session.command_cache_path(), &session.values());
        Ok(Self { session, cache })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn cache(&self) -> &CommandResolutionCache {
        &self.cache
    }

    /// Execute a command and return its text output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Config { command } => self.execute_config(command),
            Commands::Session { command } => self.execute_session(command),
            Commands::Cache { command } => self.execute_cache(command),
        }
    }

    fn execute_config(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        let values = self.session.values();
        match command {
            ConfigCommands::Get { section, option } => {
                Ok(values.get_string(section, option, None)?)
            }
            ConfigCommands::List { section } => {
                let sections = match section {
                    Some(section) => vec![section.clone()],
                    None => values.sections(),
                };
                let mut out = String::new();
                for section in sections {
                    let _ = writeln!(out, "[{}]", section);
                    for (option, value) in values.items(&section) {
                        let _ = writeln!(out, "{} = {}", option, value);
                    }
                }
                Ok(out.trim_end().to_string())
            }
        }
    }

    fn execute_session(&self, command: &SessionCommands) -> Result<String, ApiError> {
        match command {
            SessionCommands::Show { store } => {
                let dict = self.store(*store);
                let dict = dict.read();
                let object: serde_json::Map<String, Value> = dict
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Ok(to_pretty(&Value::Object(object)))
            }
            SessionCommands::Get { store, key } => {
                let dict = self.store(*store);
                let dict = dict.read();
                dict.get(key)
                    .map(to_pretty)
                    .ok_or_else(|| ApiError::NotFound(format!("{:?} key {}", store, key)))
            }
            SessionCommands::Set { store, key, value } => {
                let parsed = serde_json::from_str(value)
                    .unwrap_or_else(|_| Value::String(value.clone()));
                self.store(*store).write().set(key.clone(), parsed);
                Ok(format!("Set {}", key))
            }
            SessionCommands::Delete { store, key } => {
                match self.store(*store).write().delete(key) {
                    Some(_) => Ok(format!("Deleted {}", key)),
                    None => Err(ApiError::NotFound(format!("{:?} key {}", store, key))),
                }
            }
        }
    }

    fn execute_cache(&self, command: &CacheCommands) -> Result<String, ApiError> {
        match command {
            CacheCommands::Show => {
                let mut out = String::new();
                let _ = writeln!(out, "Path: {}", self.cache.path().display());
                let _ = writeln!(out, "Enabled: {}", self.cache.is_enabled());
                let state = if self.cache.exists() { "built" } else { "cold" };
                let _ = writeln!(out, "State: {}", state);
                match self.cache.entries() {
                    Some(entries) => {
                        let _ = writeln!(out, "Entries: {}", entries.len());
                        for (command, module) in entries {
                            let _ = writeln!(out, "  {} -> {}", command, module);
                        }
                    }
                    None => {
                        let _ = writeln!(out, "Entries: none");
                    }
                }
                Ok(out.trim_end().to_string())
            }
            CacheCommands::Lookup { argv } => match self.cache.lookup(argv) {
                Some(hit) => Ok(format!("{} -> {}", hit.command, hit.module)),
                None => Ok("Not in cache; a full load is required".to_string()),
            },
            CacheCommands::Clear => {
                if self.cache.invalidate()? {
                    Ok("Command cache removed".to_string())
                } else {
                    Ok("No command cache present".to_string())
                }
            }
        }
    }

    fn store(&self, store: StoreName) -> SharedDict {
        match store {
            StoreName::Account => self.session.account(),
            StoreName::Config => self.session.config(),
            StoreName::Session => self.session.session(),
        }
    }
}

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
