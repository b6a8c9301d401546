//! Layered configuration.
//!
//! Values come from INI files (global, then the optional local file) with
//! `PREFIX_SECTION_OPTION` environment variables taking precedence over both.

pub mod paths;
pub mod sources;
pub mod store;

pub use store::ValueStore;

/// Environment prefix used by the `cmdroute` binary.
pub const DEFAULT_ENV_PREFIX: &str = "CMDROUTE";

/// Section holding the core switches.
pub const CORE_SECTION: &str = "core";

/// Gates the command resolution cache.
pub const USE_COMMAND_CACHE: &str = "use_command_cache";

/// Enables `<cwd>/.cmdroute/config` as an extra, more specific layer.
pub const USE_LOCAL_CONFIG: &str = "use_local_config";
