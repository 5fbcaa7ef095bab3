//! Engine configuration persistence
//!
//! Stored in `~/.config/revise/config.yaml`. Missing fields take defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_MAX_HISTORY_SIZE;
use crate::notify::DEFAULT_MAX_OBSERVERS;

/// Errors raised when reading or writing a config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config directory could be determined
    NoConfigDir,
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "no config directory available"),
            Self::Io(msg) => write!(f, "config I/O error: {}", msg),
            Self::Parse(msg) => write!(f, "invalid config: {}", msg),
            Self::Serialize(msg) => write!(f, "failed to serialize config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for one editing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of history entries kept for undo
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,

    /// How often the host should persist the buffer, in seconds.
    /// The engine only carries this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_persist_interval_secs: Option<u64>,

    /// Maximum number of change observers per session
    #[serde(default = "default_max_observers")]
    pub max_observers: usize,
}

fn default_max_history_size() -> usize {
    DEFAULT_MAX_HISTORY_SIZE
}

fn default_max_observers() -> usize {
    DEFAULT_MAX_OBSERVERS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history_size: default_max_history_size(),
            auto_persist_interval_secs: None,
            max_observers: default_max_observers(),
        }
    }
}

impl EngineConfig {
    pub fn auto_persist_interval(&self) -> Option<Duration> {
        self.auto_persist_interval_secs.map(Duration::from_secs)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load config from the default location, or return defaults if absent or invalid
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(format!("{}: {}", parent.display(), e)))?;
        }

        let content = self.to_yaml_string()?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
