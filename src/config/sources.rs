//! Configuration sources: INI files and the environment overlay.

pub mod environment;
pub mod files;

pub use environment::{env_var_name, EnvSnapshot};
pub use files::{read_layers, Sections};
