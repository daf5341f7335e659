//! Startup configuration.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use alphabeta_engine::SearchConfig;
use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "ALPHABETA_CONFIG";

/// Layout of the TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub search: SearchConfig,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in config file {}", path.display()))
    }
}

/// Finds the config file named on the command line (`--config <path>` or
/// `--config=<path>`), falling back to [`CONFIG_ENV`].
pub fn config_path(args: &[String]) -> Result<Option<PathBuf>> {
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--config" || arg == "-c" {
            match args.get(i + 1) {
                Some(path) => return Ok(Some(PathBuf::from(path))),
                None => bail!("{arg} needs a path"),
            }
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Ok(Some(PathBuf::from(path)));
        }
        i += 1;
    }
    Ok(env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from))
}

/// Loads the config file if one is named; defaults otherwise.
pub fn load(args: &[String]) -> Result<FileConfig> {
    match config_path(args)? {
        Some(path) => FileConfig::load(&path),
        None => Ok(FileConfig::default()),
    }
}
