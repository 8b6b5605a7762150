//! File naming inside the data and backup directories.
//!
//! ```text
//! data/2025.json             committed
//! data/2025.json.draft       unsaved edits
//! data/*.tmp.json            write in progress, never read
//! backup/{ms}_2025.json.backup
//! ```

use std::path::{Path, PathBuf};

pub const DRAFT_SUFFIX: &str = ".draft";

#[derive(Debug, Clone)]
pub struct DataLayout {
    data_dir: PathBuf,
    backup_dir: PathBuf,
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        DataLayout {
            data_dir: data_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn committed_path(&self, year: i32) -> PathBuf {
        self.data_dir.join(format!("{}.json", year))
    }

    pub fn draft_path(&self, year: i32) -> PathBuf {
        self.data_dir.join(format!("{}.json{}", year, DRAFT_SUFFIX))
    }

    /// Years with a committed file, ascending.
    pub fn committed_years(&self) -> Vec<i32> {
        self.scan(committed_year)
    }

    /// Years with a draft file, ascending.
    pub fn draft_years(&self) -> Vec<i32> {
        self.scan(draft_year)
    }

    fn scan(&self, parse: fn(&str) -> Option<i32>) -> Vec<i32> {
        let Ok(entries) = std::fs::read_dir(&self.data_dir) else {
            return Vec::new();
        };

        let mut years: Vec<i32> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().to_str().and_then(parse))
            .collect();

        years.sort_unstable();
        years
    }
}

/// Year of a committed file name (`2025.json`); anything else is `None`.
pub fn committed_year(name: &str) -> Option<i32> {
    let stem = name.strip_suffix(".json")?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Year of a draft file name (`2025.json.draft`).
pub fn draft_year(name: &str) -> Option<i32> {
    committed_year(name.strip_suffix(DRAFT_SUFFIX)?)
}
