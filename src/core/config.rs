//! Configuration management for show.
//!
//! Handles loading configuration from TOML files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".show.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Command aliases (alias name -> canonical command name)
    pub aliases: BTreeMap<String, String>,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Shell used to run formatted commands
    pub shell: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { shell: "sh".to_string() }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Looks for config in:
    /// 1. `explicit`, when given (a missing file yields defaults)
    /// 2. `.show.toml` in current directory
    /// 3. `~/.config/sonic-show/config.toml`
    /// 4. Falls back to defaults
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            if path.exists() {
                return Self::load_from_file(path);
            }
            tracing::debug!(path = ?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = ?path, aliases = config.aliases.len(), "Loaded config");
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sonic-show"))
    }

    /// Path of the user-wide configuration file.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }
}
