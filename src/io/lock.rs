//! Single-instance lock for `smoon watch`.
//!
//! Two watchers would each keep their own view of the cooldowns between
//! store reads and double-notify. The lock file lives in the runtime
//! directory and holds the owner's PID.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Held lock; released when dropped.
#[derive(Debug)]
pub struct WatchLock {
    file: File,
    path: PathBuf,
}

impl WatchLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WatchLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Default lock path: `$XDG_RUNTIME_DIR/smoon.lock`, or `/tmp`.
pub fn default_lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("smoon.lock")
}

/// Acquire the watch lock at `path` without blocking.
///
/// Fails when another process holds it, naming that process when its PID
/// can be read.
pub fn acquire_lock(path: &Path) -> Result<WatchLock> {
    // Don't truncate: the current holder's PID must stay readable.
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open lock file {}", path.display()))?;

    if FileExt::try_lock_exclusive(&file).is_err() {
        let holder = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| content.trim().parse::<u32>().ok());
        match holder {
            Some(pid) => anyhow::bail!("smoon watch is already running (PID {pid})"),
            None => anyhow::bail!("smoon watch is already running"),
        }
    }

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()?;

    Ok(WatchLock {
        file,
        path: path.to_path_buf(),
    })
}
