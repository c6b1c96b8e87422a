//! Configuration for smoon.
//!
//! Settings come from an optional `smoon.toml`:
//!
//! ```toml
//! latitude = 48.8566          # Observer latitude (-90 to +90)
//! longitude = 2.3522          # Observer longitude (-180 to +180)
//! notifications = "ask"       # "granted", "denied" or "ask"
//! refresh_interval = 300      # Seconds between watch evaluations (30-3600)
//! state_file = "~/.local/state/smoon/state.json"
//! ```
//!
//! Every field is optional and a missing file means all defaults. The file
//! lives in `$XDG_CONFIG_HOME/smoon/` unless a directory is given with
//! `--config`.

pub mod loading;
pub mod validation;


use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_REFRESH_INTERVAL;
use crate::notify::{FileStore, Permission};

pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Parsed `smoon.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Notification permission, `ask` when unset.
    pub notifications: Option<Permission>,
    /// Seconds between evaluations in watch mode.
    pub refresh_interval: Option<u64>,
    /// Override for the state file location.
    pub state_file: Option<PathBuf>,
}

impl Config {
    /// Load from the default or `--config` location.
    pub fn load() -> Result<Self> {
        loading::load()
    }

    /// Load from an explicit file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        loading::load_from_path(path)
    }

    /// Configured coordinates, when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn refresh_interval(&self) -> u64 {
        self.refresh_interval.unwrap_or(DEFAULT_REFRESH_INTERVAL)
    }

    pub fn notifications(&self) -> Permission {
        self.notifications.unwrap_or(Permission::Undecided)
    }

    /// Store for scheduler state and the last known location.
    pub fn state_store(&self) -> FileStore {
        match &self.state_file {
            Some(path) => FileStore::new(expand_home(path)),
            None => FileStore::open_default(),
        }
    }

    /// Log the effective settings.
    pub fn log_config(&self, path: Option<&Path>) {
        match path {
            Some(path) => log_block_start!("Loaded configuration from {}", display_path(path)),
            None => log_block_start!("Using default configuration"),
        }
        match self.coordinates() {
            Some((lat, lon)) => log_indented!("Location: {lat:.4}°, {lon:.4}°"),
            None => log_indented!("Location: not configured"),
        }
        let permission = match self.notifications() {
            Permission::Granted => "granted",
            Permission::Denied => "denied",
            Permission::Undecided => "ask",
        };
        log_indented!("Notifications: {permission}");
        log_indented!("Refresh interval: {}s", self.refresh_interval());
        log_indented!("State file: {}", display_path(self.state_store().path()));
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

/// Render a path with the home directory shortened to `~`.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}
