//! Player configuration.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.scorm-rte/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional; the player runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RteError};

/// Main configuration struct for the player.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory for attempt-history files. Defaults to `history/` under
    /// the player home.
    pub history_dir: Option<PathBuf>,
    /// Treat every previous attempt as suspended when computing the entry
    /// value (the "suspend all" launch behavior).
    pub suspend_all: bool,
}

/// Player home directory: `$SCORM_RTE_HOME` or `~/.scorm-rte`.
pub fn rte_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("SCORM_RTE_HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    dirs::home_dir().map(|home| home.join(".scorm-rte"))
}

/// Path of the user config file.
pub fn config_path() -> Option<PathBuf> {
    rte_home().map(|home| home.join("config.toml"))
}

/// Resolve the history directory for a config.
pub fn history_dir(config: &Config) -> Option<PathBuf> {
    config
        .history_dir
        .clone()
        .or_else(|| rte_home().map(|home| home.join("history")))
}

impl Config {
    /// Load configuration through the precedence chain.
    ///
    /// A missing config file yields defaults; an unreadable or invalid one
    /// logs a warning and yields defaults rather than failing the player.
    pub fn load() -> Self {
        let mut config = match config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring invalid config, using defaults");
                    Self::default()
                }
            },
            _ => Self::default(),
        };
        config.apply_env();
        config
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RteError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| {
            RteError::config(format!("invalid config at {}: {}", path.display(), e))
        })
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(dir) = env::var("SCORM_RTE_HISTORY_DIR") {
            if !dir.is_empty() {
                self.history_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(value) = env::var("SCORM_RTE_SUSPEND_ALL") {
            self.suspend_all = matches!(value.as_str(), "1" | "true" | "yes");
        }
    }
}
