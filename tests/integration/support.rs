use cmdroute::config::sources::EnvSnapshot;
use cmdroute::config::{paths, ValueStore};
use cmdroute::resolve::{CommandContributions, GroupMetadata, StaticModuleRegistry};
use cmdroute::LoadError;
use std::path::Path;

pub fn values(config_dir: &Path, config: &str, vars: &[(&str, &str)]) -> ValueStore {
    let path = paths::global_config_file(config_dir);
    std::fs::write(&path, config).unwrap();
    let env = EnvSnapshot::from_vars("CMDROUTE", vars.iter().copied());
    ValueStore::from_files(env, vec![path]).unwrap()
}

fn vm() -> Result<CommandContributions, LoadError> {
    Ok(CommandContributions::new("cli.modules.vm")
        .group("vm", GroupMetadata::default())
        .command("vm create", "vm.custom#create")
        .command("vm show", "vm.custom#show"))
}

fn storage() -> Result<CommandContributions, LoadError> {
    Ok(CommandContributions::new("cli.modules.storage")
        .group("storage", GroupMetadata::default())
        .group("storage account", GroupMetadata::default())
        .command("storage account show", "storage.custom#show_account")
        .command("storage account list", "storage.custom#list_accounts"))
}

fn resource() -> Result<CommandContributions, LoadError> {
    Ok(CommandContributions::new("cli.modules.resource")
        .command("resource", "resource.custom#summary")
        .command("resource show", "resource.custom#show"))
}

pub fn registry() -> StaticModuleRegistry {
    StaticModuleRegistry::new()
        .register("vm", vm)
        .register("storage", storage)
        .register("resource", resource)
}
