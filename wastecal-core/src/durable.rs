//! Crash-safe file replacement.
//!
//! Every write goes to a sibling temporary file first and is renamed onto the
//! target, so readers never see a half-written file. Overwrites of committed
//! files additionally copy the previous contents into the backup directory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{StoreError, StoreResult};

/// Suffix appended to a target path while it is being written.
pub const TMP_SUFFIX: &str = ".tmp.json";

/// Suffix of backup snapshots, after `{timestamp}_{year}.json`.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Temporary path used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Replace `path` with `bytes`, backing up any existing file first.
///
/// Backup failures are logged and do not abort the write. Returns the backup
/// that was created, if any.
pub fn write_atomically(
    path: &Path,
    bytes: &[u8],
    backup_dir: &Path,
    year: i32,
) -> StoreResult<Option<PathBuf>> {
    let backup = if path.exists() {
        match backup(path, backup_dir, year) {
            Ok(backup_path) => {
                tracing::info!(backup = %backup_path.display(), "backup created");
                Some(backup_path)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to create backup");
                None
            }
        }
    } else {
        None
    };

    write_replacing(path, bytes)?;
    Ok(backup)
}

/// Replace `path` with `bytes` via temp file and rename, without a backup.
pub fn write_replacing(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let temp = temp_path(path);

    let result = write_synced(&temp, bytes).and_then(|_| std::fs::rename(&temp, path));

    result.map_err(|source| {
        // The target is untouched; the temp file is inert but noise
        let _ = std::fs::remove_file(&temp);
        StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Copy `path` to `{backup_dir}/{timestamp}_{year}.json.backup`.
///
/// The timestamp is in Unix milliseconds and is bumped until the name is free,
/// so two overwrites never share a backup.
pub fn backup(path: &Path, backup_dir: &Path, year: i32) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(backup_dir)?;

    let mut timestamp = Utc::now().timestamp_millis();
    let mut backup_path = backup_dir.join(backup_name(timestamp, year));
    while backup_path.exists() {
        timestamp += 1;
        backup_path = backup_dir.join(backup_name(timestamp, year));
    }

    std::fs::copy(path, &backup_path)?;
    Ok(backup_path)
}

fn backup_name(timestamp: i64, year: i32) -> String {
    format!("{}_{}.json{}", timestamp, year, BACKUP_SUFFIX)
}

/// Backups of `year` in `backup_dir`, oldest first.
pub fn list_backups(backup_dir: &Path, year: i32) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(backup_dir) else {
        return Vec::new();
    };

    let suffix = format!("_{}.json{}", year, BACKUP_SUFFIX);
    let mut backups: Vec<(i64, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            let timestamp = name.strip_suffix(&suffix)?.parse().ok()?;
            Some((timestamp, path))
        })
        .collect();

    backups.sort();
    backups.into_iter().map(|(_, path)| path).collect()
}
