//! Configuration shared by tasktrack front ends.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tasktrack_core::StatusFilter;
use tasktrack_store_json::{DEFAULT_KEY, FileStorage, TaskPersistence};

use crate::store::TaskStore;

const APP_DIR: &str = "tasktrack";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration loaded from `<config dir>/tasktrack/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Where and under which key tasks are stored.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Presentation defaults.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from `explicit` if given, otherwise from the default
    /// location. A missing default file yields the built-in defaults; a
    /// missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse and validate configuration text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Open the file-backed task store described by this configuration.
    ///
    /// `data_dir` overrides the configured directory.
    pub fn open_store(&self, data_dir: Option<&Path>) -> Result<TaskStore> {
        let dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => self.storage.resolve_data_dir()?,
        };
        let persistence = TaskPersistence::with_key(FileStorage::new(dir), self.storage.key.clone());
        TaskStore::open(persistence).context("Failed to read stored tasks")
    }

    fn validate(&self) -> Result<()> {
        self.storage.ensure_valid_key()
    }
}

/// Default configuration file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `[storage]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the task blob; defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Key (file stem) of the task blob.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key: default_key(),
        }
    }
}

fn default_key() -> String {
    DEFAULT_KEY.to_owned()
}

impl StorageConfig {
    /// Configured data directory, or `<data dir>/tasktrack`.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| anyhow!("failed to resolve a data directory; set storage.data_dir"))
    }

    fn ensure_valid_key(&self) -> Result<()> {
        let key = self.key.trim();
        if key.is_empty() {
            bail!("storage.key must not be empty");
        }
        if key.contains(['/', '\\']) || key == "." || key == ".." {
            bail!("storage.key '{}' must be a plain file name", self.key);
        }
        Ok(())
    }
}

/// `[display]` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Filter used by `ls` when none is given.
    #[serde(default)]
    pub default_filter: StatusFilter,
}
