use std::path::{Path, PathBuf};
use std::result::Result as StdResult;

use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::testing::CodeRunner;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    pub runner: RunnerConfig,
    pub catalog: CatalogConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub interpreter: PathBuf,
    pub stdout_capture_max_bytes: usize,
    pub stderr_capture_max_bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Built-in problems are used when unset.
    pub problems_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub submissions_file: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".into(),
            stdout_capture_max_bytes: 64 * 1024,
            stderr_capture_max_bytes: 64 * 1024,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            submissions_file: "./submissions.jsonl".into(),
        }
    }
}

#[derive(RustEmbed)]
#[folder = "assets/"]
pub(crate) struct Asset;

impl Asset {
    pub(crate) fn text(name: &str) -> String {
        let file = Self::get(name).unwrap_or_else(|| panic!("Missing embedded asset '{}'", name));
        String::from_utf8_lossy(file.data.as_ref()).into_owned()
    }
}

fn strip_prefix_dot(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

impl Config {
    pub const FILENAME: &str = "pjudge.toml";

    pub fn example_toml() -> String {
        Asset::text(Self::FILENAME)
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;

        let config_dir = filepath.parent().unwrap_or(Path::new(".")).to_owned();
        cfg.resolve_relative_paths(&config_dir);
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let cur_dir = cur_dir.as_ref();
        cur_dir
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
            .with_context(|| format!("Cannot find '{}'", Self::FILENAME))
    }

    pub fn from_file_finding_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_filepath = Config::find_file_in_ancestors(cur_dir)?;
        Self::from_toml_file(config_filepath)
    }

    /// Explicit file if given, else the nearest `pjudge.toml`, else defaults.
    pub fn load(explicit: Option<PathBuf>, cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        if let Some(filepath) = explicit {
            return Self::from_toml_file(filepath);
        }
        match Self::find_file_in_ancestors(&cur_dir) {
            Ok(filepath) => Self::from_toml_file(filepath),
            Err(_) => {
                log::debug!("No {} found, using defaults", Self::FILENAME);
                let mut cfg = Self::default();
                cfg.resolve_relative_paths(cur_dir.as_ref());
                Ok(cfg)
            }
        }
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        let with_base = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(strip_prefix_dot(path));
            }
        };
        if let Some(p) = self.catalog.problems_file.as_mut() {
            with_base(p);
        }
        with_base(&mut self.store.submissions_file);
    }
}

impl RunnerConfig {
    pub fn build_runner(&self) -> CodeRunner {
        CodeRunner::new()
            .interpreter(&self.interpreter)
            .stdout_capture_max_bytes(self.stdout_capture_max_bytes)
            .stderr_capture_max_bytes(self.stderr_capture_max_bytes)
    }
}
