//! CommandLoader: picks between cache resolution and a full load.

use super::cache::{CommandResolutionCache, Resolution};
use super::registry::{CommandTable, GroupTable, ModuleRegistry};
use crate::error::{ApiError, LoadError};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Why every module had to be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullLoadReason {
    /// Cache missing or disabled.
    Cold,
    /// Cache present but it does not know the command.
    Unresolved,
}

/// How the command table was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Resolved {
        command: String,
        module: String,
        elapsed: Duration,
    },
    FullLoad {
        reason: FullLoadReason,
        elapsed: Duration,
        /// Whether this load created the cache file for later invocations.
        cache_written: bool,
    },
}

/// Command and group tables for one invocation.
#[derive(Debug, Clone)]
pub struct LoadedCommands {
    pub commands: CommandTable,
    pub groups: GroupTable,
    pub outcome: LoadOutcome,
}

/// Builds the command table for an invocation.
pub struct CommandLoader<'a, R: ModuleRegistry + ?Sized> {
    registry: &'a R,
    cache: CommandResolutionCache,
}

impl<'a, R: ModuleRegistry + ?Sized> CommandLoader<'a, R> {
    pub fn new(registry: &'a R, cache: CommandResolutionCache) -> Self {
        Self { registry, cache }
    }

    pub fn cache(&self) -> &CommandResolutionCache {
        &self.cache
    }

    /// Resolve `argv` through the cache, falling back to a full load.
    ///
    /// A full load on a cold cache with caching enabled writes the cache file,
    /// which takes effect from the next invocation. Failing to write it only
    /// costs that speed-up and is not reported.
    pub fn load_command_table<S: AsRef<str>>(
        &self,
        argv: &[S],
    ) -> Result<LoadedCommands, ApiError> {
        let mut commands = CommandTable::new();
        let mut groups = GroupTable::new();

        let reason = match self
            .cache
            .resolve(argv, self.registry, &mut commands, &mut groups)?
        {
            Resolution::Resolved {
                command,
                module,
                elapsed,
            } => {
                return Ok(LoadedCommands {
                    commands,
                    groups,
                    outcome: LoadOutcome::Resolved {
                        command,
                        module,
                        elapsed,
                    },
                });
            }
            Resolution::Cold => FullLoadReason::Cold,
            Resolution::Unresolved => FullLoadReason::Unresolved,
        };

        let started = Instant::now();
        let owners = self.full_load(&mut commands, &mut groups)?;
        let elapsed = started.elapsed();
        tracing::debug!(
            ?reason,
            modules = self.registry.module_names().len(),
            commands = commands.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "full command load"
        );

        let cache_written = reason == FullLoadReason::Cold
            && self.cache.is_enabled()
            && match CommandResolutionCache::persist(&owners, self.cache.path()) {
                Ok(written) => written,
                Err(e) => {
                    tracing::warn!(error = %e, "could not write command cache");
                    false
                }
            };

        Ok(LoadedCommands {
            commands,
            groups,
            outcome: LoadOutcome::FullLoad {
                reason,
                elapsed,
                cache_written,
            },
        })
    }

    /// Load every module. Returns command name -> registry name of its module.
    ///
    /// Owners are recorded under the name the registry loads them by, so a
    /// cache built from them always names a loadable module. Two modules
    /// providing the same command is an error.
    pub fn full_load(
        &self,
        commands: &mut CommandTable,
        groups: &mut GroupTable,
    ) -> Result<BTreeMap<String, String>, LoadError> {
        let mut owners: BTreeMap<String, String> = BTreeMap::new();
        for name in self.registry.module_names() {
            let contributions = self.registry.load(&name)?;
            for command in contributions.commands.keys() {
                if let Some(first) = owners.get(command) {
                    return Err(LoadError::DuplicateCommand {
                        command: command.clone(),
                        first: first.clone(),
                        second: name.clone(),
                    });
                }
                owners.insert(command.clone(), name.clone());
            }
            contributions.merge_into(commands, groups);
        }
        Ok(owners)
    }
}
