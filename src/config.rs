//! Configuration module for hazsync
//!
//! Manages where local state is stored and the sizing of history and search
//! pages. Configuration is stored as TOML in the user's config directory.

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::storage::{SledStore, StorageError};

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HazsyncConfig {
    /// Directory of the local state database; defaults to the user's data dir
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Number of recently viewed substances to keep
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Results requested per catalog page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Base URL of the remote catalog, for transport implementations
    #[serde(default)]
    pub catalog_url: Option<String>,
}

const fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for HazsyncConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            page_size: DEFAULT_PAGE_SIZE,
            catalog_url: None,
        }
    }
}

impl HazsyncConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("hazsync").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from `path`; a missing file yields the defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be parsed or holds invalid values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be determined or
    /// the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be serialized to TOML
    /// or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Reject sizes the stores and controller cannot work with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Message(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Message("page_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Configured database directory, or `<data_local_dir>/hazsync/state`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no path is configured and the system data
    /// directory cannot be determined.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))?;
        Ok(data_dir.join("hazsync").join("state"))
    }

    /// Open the configured sled store
    ///
    /// # Errors
    ///
    /// Returns `HazsyncError` if the path cannot be resolved or the database
    /// cannot be opened.
    pub fn open_store(&self) -> Result<SledStore, crate::HazsyncError> {
        let path = self.database_path()?;
        let store = SledStore::open(&path).inspect_err(|e: &StorageError| {
            tracing::warn!(path = %path.display(), error = %e, "failed to open state database");
        })?;
        Ok(store)
    }
}
