use std::{path::PathBuf, process::exit};

use anyhow::Context as _;
use pjudge_core::{catalog::StaticCatalog, store::JsonlStore, Config};

use crate::cmd::GlobalArgs;

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Failed to get current dir: {}", e);
        exit(1);
    })
}

pub fn load_config(global_args: &GlobalArgs) -> anyhow::Result<Config> {
    Config::load(global_args.config.clone(), current_dir())
}

pub fn open_catalog(cfg: &Config) -> anyhow::Result<StaticCatalog> {
    match &cfg.catalog.problems_file {
        Some(path) => StaticCatalog::from_json_file(path)
            .with_context(|| format!("Failed to load problems from {:?}", path)),
        None => StaticCatalog::builtin().context("Failed to load built-in problems"),
    }
}

pub fn open_store(cfg: &Config) -> JsonlStore {
    JsonlStore::new(&cfg.store.submissions_file)
}
