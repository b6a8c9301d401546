//! Module registry port and command/group table types.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A command contributed by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Fully-qualified, space separated command name (`storage account show`).
    pub name: String,
    /// Reference to the implementing operation, e.g. `storage.custom#show_account`.
    pub operation: String,
    /// Module the command was loaded from; set when merged into a table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Metadata attached to a command group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub experimental: bool,
}

/// Command name -> command.
pub type CommandTable = BTreeMap<String, CommandEntry>;

/// Group name -> group metadata.
pub type GroupTable = BTreeMap<String, GroupMetadata>;

/// What one module adds to the command and group tables.
#[derive(Debug, Clone, Default)]
pub struct CommandContributions {
    /// Dotted path of the module, e.g. `cli.modules.storage`.
    pub module: String,
    pub commands: CommandTable,
    pub groups: GroupTable,
}

impl CommandContributions {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Add a command.
    pub fn command(mut self, name: impl Into<String>, operation: impl Into<String>) -> Self {
        let name = name.into();
        self.commands.insert(
            name.clone(),
            CommandEntry {
                name,
                operation: operation.into(),
                source: None,
            },
        );
        self
    }

    /// Add a command group.
    pub fn group(mut self, name: impl Into<String>, metadata: GroupMetadata) -> Self {
        self.groups.insert(name.into(), metadata);
        self
    }

    /// Tag every command with this module and move them into the given tables.
    ///
    /// Commands replace existing entries of the same name; groups already
    /// present are kept.
    pub fn merge_into(self, commands: &mut CommandTable, groups: &mut GroupTable) {
        for (name, mut entry) in self.commands {
            entry.source = Some(self.module.clone());
            commands.insert(name, entry);
        }
        for (name, metadata) in self.groups {
            groups.entry(name).or_insert(metadata);
        }
    }
}

/// Last component of a dotted module path.
pub fn short_module_name(module: &str) -> &str {
    module.rsplit('.').next().unwrap_or(module)
}

/// Loads command modules by short name.
pub trait ModuleRegistry {
    /// Short names of every installed module, in load order. Names contain
    /// no `.`; the command cache stores them as-is.
    fn module_names(&self) -> Vec<String>;

    /// Import one module. Fails if it is unknown or cannot be imported.
    fn load(&self, module: &str) -> Result<CommandContributions, LoadError>;
}

/// Builds the contributions of one module.
pub type ModuleFactory = fn() -> Result<CommandContributions, LoadError>;

/// Registry backed by a compile-time table of factories.
#[derive(Debug, Default, Clone)]
pub struct StaticModuleRegistry {
    modules: BTreeMap<String, ModuleFactory>,
}

impl StaticModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under the module's short name.
    pub fn register(mut self, short_name: impl Into<String>, factory: ModuleFactory) -> Self {
        self.modules.insert(short_name.into(), factory);
        self
    }
}

impl ModuleRegistry for StaticModuleRegistry {
    fn module_names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    fn load(&self, module: &str) -> Result<CommandContributions, LoadError> {
        let factory = self
            .modules
            .get(module)
            .ok_or_else(|| LoadError::UnknownModule(module.to_string()))?;
        factory()
    }
}
