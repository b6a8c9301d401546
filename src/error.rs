//! Error types for configuration, storage and command loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the layered value store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No environment variable, no file value and no fallback.
    #[error("configuration value not found: [{section}] {option}")]
    NotFound { section: String, option: String },

    /// A value was present but could not be converted to the requested type.
    #[error("invalid {expected} value for [{section}] {option}: {raw:?}")]
    Conversion {
        section: String,
        option: String,
        raw: String,
        expected: &'static str,
    },

    /// The configuration files could not be parsed.
    #[error("failed to read configuration files: {0}")]
    Source(#[from] config::ConfigError),
}

/// Errors raised while reading or writing persisted files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by module loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("module not registered: {0}")]
    UnknownModule(String),

    #[error("failed to import module {module}: {reason}")]
    ImportFailed { module: String, reason: String },

    #[error("command '{command}' is provided by both {first} and {second}")]
    DuplicateCommand {
        command: String,
        first: String,
        second: String,
    },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Load(#[from] LoadError),

    /// A requested key or entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Setup problems that are not tied to a single value (paths, logging).
    #[error("configuration error: {0}")]
    ConfigSetup(String),
}
