//! Session stores: small JSON files mirrored in memory.
//!
//! Every artifact is replaced by a whole-file write, so concurrent processes
//! observe either the previous or the next complete version.

pub mod atomic;
pub mod context;
pub mod dict;

pub use context::{SessionContext, SharedDict};
pub use dict::PersistedDict;
