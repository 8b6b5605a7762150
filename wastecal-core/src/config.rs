//! Global wastecal configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};
use crate::layout::DataLayout;

static DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_PORT: u16 = 8080;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Configuration from ~/.config/wastecal/config.toml, overridable with
/// `WASTECAL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct WastecalConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Defaults to a `backup` directory next to `data_dir`.
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for WastecalConfig {
    fn default() -> Self {
        WastecalConfig {
            data_dir: default_data_dir(),
            backup_dir: None,
            port: DEFAULT_PORT,
        }
    }
}

impl WastecalConfig {
    pub fn config_path() -> StoreResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StoreError::Config("Could not determine config directory".into()))?
            .join("wastecal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config path (if present) and the environment.
    pub fn load() -> StoreResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> StoreResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("WASTECAL"))
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn backup_path(&self) -> PathBuf {
        if let Some(dir) = &self.backup_dir {
            return expand(dir);
        }

        let data_path = self.data_path();
        match data_path.parent() {
            Some(parent) => parent.join("backup"),
            None => data_path.join("backup"),
        }
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout::new(self.data_path(), self.backup_path())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = WastecalConfig::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.backup_path(), PathBuf::from("./backup"));
    }

    #[test]
    fn test_file_values_are_used() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/wastecal/data\"\nbackup_dir = \"/srv/wastecal/snapshots\"\nport = 9000\n",
        )
        .unwrap();

        let config = WastecalConfig::load_from(&path).unwrap();

        assert_eq!(config.port, 9000);
        let layout = config.layout();
        assert_eq!(layout.data_dir(), Path::new("/srv/wastecal/data"));
        assert_eq!(layout.backup_dir(), Path::new("/srv/wastecal/snapshots"));
    }

    #[test]
    fn test_backup_dir_defaults_next_to_data_dir() {
        let config = WastecalConfig {
            data_dir: PathBuf::from("/srv/wastecal/data"),
            ..Default::default()
        };
        assert_eq!(config.backup_path(), PathBuf::from("/srv/wastecal/backup"));
    }
}
