//! Environment variable source: PREFIX_SECTION_OPTION, uppercased.

use std::collections::HashMap;

/// Build the variable name that overrides `[section] option`.
pub fn env_var_name(prefix: &str, section: &str, option: &str) -> String {
    format!("{}_{}_{}", prefix, section, option).to_uppercase()
}

/// Snapshot of the prefixed environment variables, taken once.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    prefix: String,
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture every variable of the current process that starts with `PREFIX_`.
    ///
    /// Variables whose name or value is not valid UTF-8 are ignored.
    pub fn capture(prefix: &str) -> Self {
        let vars = std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        });
        Self::from_vars(prefix, vars)
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let marker = format!("{}_", prefix.to_uppercase());
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(&marker))
            .collect();
        Self {
            prefix: prefix.to_uppercase(),
            vars,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn lookup(&self, section: &str, option: &str) -> Option<&str> {
        self.vars
            .get(&env_var_name(&self.prefix, section, option))
            .map(String::as_str)
    }

    /// Options set for `section` through the environment, lowercased.
    pub fn options_for(&self, section: &str) -> Vec<(String, String)> {
        let marker = format!("{}_{}_", self.prefix, section.to_uppercase());
        let mut found: Vec<(String, String)> = self
            .vars
            .iter()
            .filter_map(|(key, value)| {
                let option = key.strip_prefix(&marker)?;
                if option.is_empty() {
                    return None;
                }
                Some((option.to_lowercase(), value.clone()))
            })
            .collect();
        found.sort();
        found
    }
}
