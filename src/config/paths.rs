//! Configuration directory resolution.

use crate::error::ApiError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CMDROUTE_CONFIG_DIR";

/// Directory name used both under the home directory and for the local layer.
pub const DIR_NAME: &str = ".cmdroute";

/// Name of the INI file inside a configuration directory.
pub const CONFIG_FILE_NAME: &str = "config";

/// Get the configuration directory
///
/// Returns `$CMDROUTE_CONFIG_DIR` if set and non-empty, otherwise `$HOME/.cmdroute`.
pub fn config_dir() -> Result<PathBuf, ApiError> {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV))
}

pub(crate) fn resolve_config_dir(override_dir: Option<OsString>) -> Result<PathBuf, ApiError> {
    if let Some(dir) = override_dir {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let base = directories::BaseDirs::new().ok_or_else(|| {
        ApiError::ConfigSetup(
            "Could not determine configuration directory (home directory not found)".to_string(),
        )
    })?;
    Ok(base.home_dir().join(DIR_NAME))
}

/// Global INI file: `<config_dir>/config`.
pub fn global_config_file(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Local INI file for a working directory: `<cwd>/.cmdroute/config`.
pub fn local_config_file(working_dir: &Path) -> PathBuf {
    working_dir.join(DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Create the configuration directory if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<(), ApiError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| {
            ApiError::ConfigSetup(format!(
                "Failed to create configuration directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }
    Ok(())
}
