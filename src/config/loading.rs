//! Configuration loading.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::display_path;
use super::validation::validate_config;
use crate::constants::CONFIG_FILE_NAME;

/// Configuration directory chosen on the command line, set once at startup.
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for this process.
///
/// Can only be called once; a second call is an error.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// The `--config` directory, if one was given.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|dir| dir.clone())
}

/// Path of `smoon.toml`: the custom directory, `$XDG_CONFIG_HOME/smoon`, or
/// the platform config directory.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_home = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    let config_home = match config_home {
        Some(dir) => dir,
        None => dirs::config_dir().context("Could not determine config directory")?,
    };

    Ok(config_home.join("smoon").join(CONFIG_FILE_NAME))
}

/// Load the configuration from its default location.
pub fn load() -> Result<Config> {
    let path = get_config_path()?;
    load_from_path(&path)
}

/// Load and validate a configuration file. A missing file yields defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        log_debug!("No configuration at {}, using defaults", display_path(path));
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", display_path(path)))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", display_path(path)))?;

    validate_config(&config)
        .with_context(|| format!("Invalid configuration in {}", display_path(path)))?;

    Ok(config)
}
