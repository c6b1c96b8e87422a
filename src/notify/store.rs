//! Key-value persistence for scheduler state and the last known location.
//!
//! [`FileStore`] keeps a flat JSON object in the XDG state directory, so
//! cooldowns survive restarts. [`MemoryStore`] backs tests and one-shot runs.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::constants::STATE_FILE_NAME;

/// String key-value store.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Volatile store living only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Get the state directory.
///
/// State lives in `$XDG_STATE_HOME/smoon`, falling back to
/// `~/.local/state/smoon` (or `/tmp` when there is no home directory).
pub fn get_state_dir() -> PathBuf {
    let state_home = std::env::var("XDG_STATE_HOME")
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local/state")
        });

    state_home.join("smoon")
}

/// JSON-file backed store.
///
/// Every write rewrites the whole document through a temporary file and a
/// rename, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location in the state directory.
    pub fn open_default() -> Self {
        Self::new(get_state_dir().join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read(&self.path)
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;
        if content.trim_ascii().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_slice(&content)
            .with_context(|| format!("State file {} is not valid JSON", self.path.display()))
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("State file path has no parent directory")?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory {}", dir.display()))?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        let json = serde_json::to_string_pretty(document)?;
        temp.write_all(json.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path)
            .with_context(|| format!("Failed to replace state file {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_document()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt document is replaced; a failed read leaves the file alone.
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(e) if e.downcast_ref::<serde_json::Error>().is_some() => {
                log_warning!("Discarding corrupt state: {e:#}");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        FileStore::new(&path).set("alpha", "1700000000000").unwrap();
        FileStore::new(&path).set("beta", "x").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("alpha").unwrap().as_deref(), Some("1700000000000"));
        assert_eq!(reopened.get("beta").unwrap().as_deref(), Some("x"));
        assert_eq!(reopened.get("gamma").unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_errors_then_recovers_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("key").is_err());

        store.set("key", "value").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_file_store_invalid_utf8_is_replaced_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("key").is_err());
        store.set("key", "value").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_file_store_read_failure_keeps_existing_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        // A directory in place of the file cannot be read, but is not corrupt.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("key").is_err());
        assert!(store.set("key", "value").is_err());
        assert!(path.join("keep").exists());
    }

    #[test]
    #[serial]
    fn test_state_dir_honours_xdg_state_home() {
        let dir = tempdir().unwrap();
        let original = std::env::var("XDG_STATE_HOME").ok();
        unsafe {
            std::env::set_var("XDG_STATE_HOME", dir.path());
        }

        let state_dir = get_state_dir();

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_STATE_HOME", val),
                None => std::env::remove_var("XDG_STATE_HOME"),
            }
        }

        assert_eq!(state_dir, dir.path().join("smoon"));
    }
}
