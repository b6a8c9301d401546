use cmdroute::resolve::{
    CommandLoader, CommandResolutionCache, CommandTable, FullLoadReason, GroupTable, LoadOutcome,
    Resolution,
};
use cmdroute::{ApiError, LoadError, SessionContext};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

use crate::integration::support::{registry, values};

#[test]
fn storage_invocation_resolves_to_storage_module() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commandIndex.csv");
    fs::write(&path, "vm create,vm\nstorage account show,storage\n").unwrap();
    let cache = CommandResolutionCache::new(&path, true);
    let mut commands = CommandTable::new();
    let mut groups = GroupTable::new();

    let resolution = cache
        .resolve(
            &["storage", "account", "show", "-g", "rg1"],
            &registry(),
            &mut commands,
            &mut groups,
        )
        .unwrap();

    match resolution {
        Resolution::Resolved {
            command, module, ..
        } => {
            assert_eq!(command, "storage account show");
            assert_eq!(module, "storage");
        }
        other => panic!("expected storage resolution, got {other:?}"),
    }
    assert!(commands.keys().all(|name| name.starts_with("storage")));
    assert!(groups.contains_key("storage account"));
    assert!(!commands.contains_key("vm create"));
}

#[test]
fn longest_command_wins_over_shorter_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commandIndex.csv");
    fs::write(&path, "resource,vm\nresource show,resource\n").unwrap();
    let cache = CommandResolutionCache::new(&path, true);

    let hit = cache.lookup(&["resource", "show", "myId"]).unwrap();
    assert_eq!(hit.command, "resource show");
    assert_eq!(hit.module, "resource");

    let hit = cache.lookup(&["resource", "--help"]).unwrap();
    assert_eq!(hit.module, "vm");
}

#[test]
fn unknown_nouns_are_unresolved_not_errors() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commandIndex.csv");
    fs::write(&path, "vm create,vm\n").unwrap();
    let cache = CommandResolutionCache::new(&path, true);
    let mut commands = CommandTable::new();
    let mut groups = GroupTable::new();

    for argv in [vec!["network", "vnet", "list"], vec!["--version"], vec![]] {
        let resolution = cache
            .resolve(&argv, &registry(), &mut commands, &mut groups)
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved, "{argv:?}");
    }
    assert!(commands.is_empty());
}

#[test]
fn persist_twice_keeps_first_contents() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commandIndex.csv");
    let first: BTreeMap<String, String> =
        [("vm create".to_string(), "cli.modules.vm".to_string())].into();
    let second: BTreeMap<String, String> =
        [("sql db show".to_string(), "cli.modules.sql".to_string())].into();

    assert!(CommandResolutionCache::persist(&first, &path).unwrap());
    let after_first = fs::read_to_string(&path).unwrap();
    assert!(!CommandResolutionCache::persist(&second, &path).unwrap());

    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    assert_eq!(after_first, "vm create,vm\n");
}

#[test]
fn cold_cache_full_load_then_persist() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let ctx = SessionContext::open(
        dir,
        values(dir, "", &[("CMDROUTE_CORE_USE_COMMAND_CACHE", "true")]),
    )
    .unwrap();
    let cache = CommandResolutionCache::from_config(ctx.command_cache_path(), &ctx.values());
    assert!(cache.is_enabled());
    assert!(!cache.exists());

    let registry = registry();
    let loader = CommandLoader::new(&registry, cache);
    let loaded = loader.load_command_table(&["vm", "create"]).unwrap();

    assert!(matches!(
        loaded.outcome,
        LoadOutcome::FullLoad {
            reason: FullLoadReason::Cold,
            cache_written: true,
            ..
        }
    ));
    assert_eq!(loaded.commands.len(), 6);
    assert!(loader.cache().exists());

    let next = loader.load_command_table(&["vm", "create", "--name", "box"]).unwrap();
    match next.outcome {
        LoadOutcome::Resolved { module, .. } => assert_eq!(module, "vm"),
        other => panic!("expected cached resolution, got {other:?}"),
    }
    assert_eq!(next.commands.len(), 2);
    assert_eq!(
        next.commands["vm create"].source.as_deref(),
        Some("cli.modules.vm")
    );
}

#[test]
fn cache_file_without_flag_stays_cold() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let ctx = SessionContext::open(dir, values(dir, "", &[])).unwrap();
    fs::write(ctx.command_cache_path(), "vm create,vm\n").unwrap();
    let cache = CommandResolutionCache::from_config(ctx.command_cache_path(), &ctx.values());

    assert!(!cache.exists());
    let registry = registry();
    let loaded = CommandLoader::new(&registry, cache)
        .load_command_table(&["vm", "create"])
        .unwrap();
    assert!(matches!(
        loaded.outcome,
        LoadOutcome::FullLoad {
            reason: FullLoadReason::Cold,
            cache_written: false,
            ..
        }
    ));
}

#[test]
fn unparseable_flag_disables_cache() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let store = values(dir, "[core]\nuse_command_cache = sometimes\n", &[]);

    let cache = CommandResolutionCache::from_config(dir.join("commandIndex.csv"), &store);

    assert!(!cache.is_enabled());
}

#[test]
fn stale_cache_falls_back_to_full_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commandIndex.csv");
    // Built before the storage module existed.
    fs::write(&path, "vm create,vm\nvm show,vm\n").unwrap();
    let registry = registry();
    let loader = CommandLoader::new(&registry, CommandResolutionCache::new(&path, true));

    let loaded = loader
        .load_command_table(&["storage", "account", "list"])
        .unwrap();

    assert!(loaded.commands.contains_key("storage account list"));
    assert!(matches!(
        loaded.outcome,
        LoadOutcome::FullLoad {
            reason: FullLoadReason::Unresolved,
            ..
        }
    ));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "vm create,vm\nvm show,vm\n"
    );
}

#[test]
fn cached_module_that_fails_to_import_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commandIndex.csv");
    fs::write(&path, "sql db show,sql\n").unwrap();
    let registry = registry();
    let loader = CommandLoader::new(&registry, CommandResolutionCache::new(&path, true));

    let err = loader.load_command_table(&["sql", "db", "show"]).unwrap_err();

    assert!(matches!(err, ApiError::Load(LoadError::UnknownModule(ref m)) if m == "sql"));
}
