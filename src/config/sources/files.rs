//! INI file source. Files are layered in order; later files win.
//!
//! Values are not read verbatim: the INI backend strips surrounding quotes,
//! so `name = "quoted"` reads as `quoted`.

use crate::error::ConfigError;
use config::{Config, File, FileFormat, Source, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Parsed file values: section -> option -> raw string, names lowercased.
pub type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Parse and merge the given INI files. Missing files are skipped.
pub fn read_layers(paths: &[PathBuf]) -> Result<Sections, ConfigError> {
    let mut builder = Config::builder();
    for path in paths {
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Ini)
                .required(false),
        );
    }
    let merged = builder.build()?;
    Ok(flatten(merged.collect()?))
}

fn flatten(root: config::Map<String, Value>) -> Sections {
    let mut sections = Sections::new();
    for (section, value) in root {
        // Keys outside any [section] are not addressable.
        let Ok(table) = value.into_table() else {
            tracing::debug!(key = %section, "ignoring configuration key outside a section");
            continue;
        };
        let options = sections.entry(section.to_lowercase()).or_default();
        for (option, raw) in table {
            match raw.into_string() {
                Ok(raw) => {
                    options.insert(option.to_lowercase(), raw);
                }
                Err(e) => {
                    tracing::debug!(section = %section, option = %option, error = %e, "ignoring non-scalar value");
                }
            }
        }
    }
    sections
}
