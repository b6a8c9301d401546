//! Command resolution
//!
//! Decides, from raw argv, which single command module has to be loaded. A
//! cache file written after a full load maps each command name to its owning
//! module; when it cannot answer, the caller falls back to loading every
//! module, which is always correct and merely slower.

pub mod argv;
pub mod cache;
pub mod loader;
pub mod registry;

pub use cache::{CacheHit, CommandResolutionCache, Resolution};
pub use loader::{CommandLoader, FullLoadReason, LoadOutcome, LoadedCommands};
pub use registry::{
    short_module_name, CommandContributions, CommandEntry, CommandTable, GroupMetadata,
    GroupTable, ModuleFactory, ModuleRegistry, StaticModuleRegistry,
};
