//! cmdroute: command resolution for modular command-line tools
//!
//! Decides, from a partially parsed invocation, which single command module has
//! to be loaded, backed by a layered configuration store and small JSON session
//! stores that survive between invocations.

pub mod config;
pub mod error;
pub mod logging;
pub mod resolve;
pub mod session;
pub mod tooling;

pub use config::ValueStore;
pub use error::{ApiError, ConfigError, LoadError, StorageError};
pub use resolve::{
    CommandLoader, CommandResolutionCache, LoadOutcome, ModuleRegistry, Resolution,
    StaticModuleRegistry,
};
pub use session::{PersistedDict, SessionContext};
