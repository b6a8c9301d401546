//! Logging System
//!
//! Structured logging through `tracing`. Level, format and destination come
//! from the `[logging]` section of the value store, so the usual
//! `CMDROUTE_LOGGING_*` variables override file values. `CMDROUTE_LOG`, when
//! set, replaces the level filter entirely.

use crate::config::ValueStore;
use crate::error::{ApiError, ConfigError};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter override, in `EnvFilter` directive syntax.
pub const LOG_FILTER_ENV: &str = "CMDROUTE_LOG";

const SECTION: &str = "logging";

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error, off
    pub level: String,
    /// Output format: json, text
    pub format: String,
    /// Output destination: stderr, file, file+stderr
    pub output: String,
    /// Log file path when output includes file; None means use runtime default
    pub file: Option<PathBuf>,
    /// Colored output (text format, stderr only)
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            format: "text".to_string(),
            output: "stderr".to_string(),
            file: None,
            color: true,
        }
    }
}

impl LoggingConfig {
    /// Read `[logging]`, filling unset keys with defaults.
    pub fn from_values(values: &ValueStore) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let file = if values.has(SECTION, "file") {
            Some(PathBuf::from(values.get_string(SECTION, "file", None)?))
        } else {
            None
        };
        Ok(Self {
            enabled: values.get_bool(SECTION, "enabled", Some(defaults.enabled))?,
            level: values.get_string(SECTION, "level", Some(defaults.level.as_str()))?,
            format: values.get_string(SECTION, "format", Some(defaults.format.as_str()))?,
            output: values.get_string(SECTION, "output", Some(defaults.output.as_str()))?,
            file,
            color: values.get_bool(SECTION, "color", Some(defaults.color))?,
        })
    }
}

/// Resolve the log file path: configured path, else the platform state directory.
pub fn resolve_log_file_path(configured: Option<PathBuf>) -> Result<PathBuf, ApiError> {
    if let Some(p) = configured {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    let project_dirs = directories::ProjectDirs::from("", "", "cmdroute").ok_or_else(|| {
        ApiError::ConfigSetup("Could not determine platform directory for log file".to_string())
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join("cmdroute.log"))
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| ApiError::ConfigSetup(format!("Failed to initialize logging: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let json = is_json_format(&config.format)?;
    let output = parse_output_destinations(&config.output)?;
    let writer = build_writer(config, &output)?;

    let result = if json {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color && !output.file)
                    .with_writer(writer),
            )
            .try_init()
    };
    result.map_err(|e| ApiError::ConfigSetup(format!("Failed to initialize logging: {}", e)))
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| ApiError::ConfigSetup(format!("Invalid log level {:?}: {}", config.level, e)))
}

fn is_json_format(format: &str) -> Result<bool, ApiError> {
    match format {
        "json" => Ok(true),
        "text" => Ok(false),
        other => Err(ApiError::ConfigSetup(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stderr: bool,
    file: bool,
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, ApiError> {
    match output {
        "stderr" => Ok(OutputDestinations {
            stderr: true,
            file: false,
        }),
        "file" => Ok(OutputDestinations {
            stderr: false,
            file: true,
        }),
        "file+stderr" => Ok(OutputDestinations {
            stderr: true,
            file: true,
        }),
        _ => Err(ApiError::ConfigSetup(format!(
            "Invalid log output: {} (must be 'stderr', 'file' or 'file+stderr')",
            output
        ))),
    }
}

fn build_writer(
    config: &LoggingConfig,
    output: &OutputDestinations,
) -> Result<BoxMakeWriter, ApiError> {
    if !output.file {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    }

    let log_file = resolve_log_file_path(config.file.clone())?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigSetup(format!("Failed to create log directory: {}", e))
        })?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            ApiError::ConfigSetup(format!("Failed to open log file {:?}: {}", log_file, e))
        })?;
    let file = Mutex::new(file);

    if output.stderr {
        Ok(BoxMakeWriter::new(file.and(std::io::stderr)))
    } else {
        Ok(BoxMakeWriter::new(file))
    }
}
