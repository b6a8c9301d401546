//! ValueStore: read-only, layered access to scalar configuration values.

use super::paths;
use super::sources::{read_layers, EnvSnapshot, Sections};
use super::{CORE_SECTION, USE_LOCAL_CONFIG};
use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Layered configuration reader.
///
/// Lookup order for `[section] option`:
/// 1. `PREFIX_SECTION_OPTION` environment variable
/// 2. the parsed files, later files overriding earlier ones
/// 3. the fallback passed by the caller
///
/// Nothing is invented: without a value and without a fallback the lookup
/// fails with [`ConfigError::NotFound`].
#[derive(Debug, Clone)]
pub struct ValueStore {
    env: EnvSnapshot,
    files: Sections,
    paths: Vec<PathBuf>,
}

impl ValueStore {
    /// Load the global file from `config_dir` and, when the global layer enables
    /// `core.use_local_config`, the local file under the current directory.
    pub fn load(prefix: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let env = EnvSnapshot::capture(prefix);
        let working_dir = std::env::current_dir().ok();
        Self::load_with(env, config_dir, working_dir.as_deref())
    }

    /// Same as [`ValueStore::load`] with an explicit environment and working directory.
    pub fn load_with(
        env: EnvSnapshot,
        config_dir: &Path,
        working_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let global = paths::global_config_file(config_dir);
        let global_only = Self::from_files(env.clone(), vec![global.clone()])?;

        let use_local = match global_only.get_bool(CORE_SECTION, USE_LOCAL_CONFIG, Some(false)) {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring local configuration");
                false
            }
        };

        match working_dir {
            Some(dir) if use_local => {
                Self::from_files(env, vec![global, paths::local_config_file(dir)])
            }
            _ => Ok(global_only),
        }
    }

    /// Build from an ordered list of files (general first, most specific last).
    pub fn from_files(env: EnvSnapshot, paths: Vec<PathBuf>) -> Result<Self, ConfigError> {
        let files = read_layers(&paths)?;
        tracing::debug!(files = ?paths, "configuration loaded");
        Ok(Self { env, files, paths })
    }

    /// Files consulted, in precedence order (lowest first).
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn env_prefix(&self) -> &str {
        self.env.prefix()
    }

    /// True if the environment or any file provides the value.
    pub fn has(&self, section: &str, option: &str) -> bool {
        self.raw(section, option).is_some()
    }

    pub fn get_string(
        &self,
        section: &str,
        option: &str,
        fallback: Option<&str>,
    ) -> Result<String, ConfigError> {
        match (self.raw(section, option), fallback) {
            (Some(raw), _) => Ok(raw.to_string()),
            (None, Some(fallback)) => Ok(fallback.to_string()),
            (None, None) => Err(ConfigError::NotFound {
                section: section.to_string(),
                option: option.to_string(),
            }),
        }
    }

    pub fn get_int(
        &self,
        section: &str,
        option: &str,
        fallback: Option<i64>,
    ) -> Result<i64, ConfigError> {
        self.get_converted(section, option, fallback, "integer", |raw| {
            raw.trim().parse().ok()
        })
    }

    pub fn get_float(
        &self,
        section: &str,
        option: &str,
        fallback: Option<f64>,
    ) -> Result<f64, ConfigError> {
        self.get_converted(section, option, fallback, "float", |raw| {
            raw.trim().parse().ok()
        })
    }

    pub fn get_bool(
        &self,
        section: &str,
        option: &str,
        fallback: Option<bool>,
    ) -> Result<bool, ConfigError> {
        self.get_converted(section, option, fallback, "boolean", parse_bool)
    }

    /// Sections present in the configuration files. Environment-only
    /// sections are not listed; use [`items`](Self::items) to see overrides.
    pub fn sections(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Merged options of one section, environment overrides applied.
    pub fn items(&self, section: &str) -> BTreeMap<String, String> {
        let mut merged = self
            .files
            .get(&section.to_lowercase())
            .cloned()
            .unwrap_or_default();
        for (option, value) in self.env.options_for(section) {
            merged.insert(option, value);
        }
        merged
    }

    fn raw(&self, section: &str, option: &str) -> Option<&str> {
        if let Some(value) = self.env.lookup(section, option) {
            return Some(value);
        }
        self.files
            .get(&section.to_lowercase())
            .and_then(|options| options.get(&option.to_lowercase()))
            .map(String::as_str)
    }

    fn get_converted<T>(
        &self,
        section: &str,
        option: &str,
        fallback: Option<T>,
        expected: &'static str,
        convert: impl Fn(&str) -> Option<T>,
    ) -> Result<T, ConfigError> {
        let Some(raw) = self.raw(section, option) else {
            return fallback.ok_or_else(|| ConfigError::NotFound {
                section: section.to_string(),
                option: option.to_string(),
            });
        };
        convert(raw).ok_or_else(|| ConfigError::Conversion {
            section: section.to_string(),
            option: option.to_string(),
            raw: raw.to_string(),
            expected,
        })
    }
}

/// Parse the accepted boolean spellings, case-insensitively.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}
