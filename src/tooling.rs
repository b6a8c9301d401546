//! Tooling & Integration Layer
//!
//! Command-line access to the resolution cache, configuration and session
//! stores.

pub mod cli;

pub use cli::{CacheCommands, Cli, CliContext, Commands, ConfigCommands, SessionCommands, StoreName};
