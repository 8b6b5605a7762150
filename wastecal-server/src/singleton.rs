//! Ensure only one editing server owns a data directory.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".wastecal.lock";

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

fn lock_path(data_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    Ok(data_dir.join(LOCK_FILE))
}

/// Acquire an exclusive lock on the data directory, failing if another
/// instance is editing it
pub fn acquire_lock(data_dir: &Path) -> Result<LockGuard> {
    let path = lock_path(data_dir)?;
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another wastecal-server instance is already editing {}.\n\
            If you believe this is an error, remove: {}",
            data_dir.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}
