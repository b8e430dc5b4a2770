// Configuration management for the tutorfav CLI
//
// Cross-platform config stored in:
// - macOS: ~/Library/Application Support/tutorfav/config.json
// - Linux: ~/.config/tutorfav/config.json
// - Windows: %APPDATA%\tutorfav\config.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tutorfav_core::{FavoritesConfig, DEFAULT_FAVORITES_KEY, DEFAULT_MESSAGING_SCHEME};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of the favorites database (defaults under the data dir)
    pub storage_path: Option<String>,

    /// Key the favorites list is stored under
    pub favorites_key: String,

    /// Upper bound on a single storage call, in milliseconds
    pub storage_timeout_ms: u64,

    /// URI scheme of the messaging app used by `contact`
    pub messaging_scheme: String,

    /// Also write logs to a daily rolling file in the data dir
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
            storage_timeout_ms: 5_000,
            messaging_scheme: DEFAULT_MESSAGING_SCHEME.to_string(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Get the config directory path (cross-platform)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("tutorfav");

        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir)
    }

    /// Get the data directory path (cross-platform)
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Failed to determine data directory")?
            .join("tutorfav");

        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        Ok(data_dir)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config =
                serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Where the favorites database lives
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(Self::data_dir()?.join("favorites.db")),
        }
    }

    pub fn favorites_config(&self) -> FavoritesConfig {
        FavoritesConfig {
            key: self.favorites_key.clone(),
            timeout: Duration::from_millis(self.storage_timeout_ms),
        }
    }

    /// Set a config value (not persisted; call `save`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "storage_path" => {
                self.storage_path = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "favorites_key" => {
                if value.trim().is_empty() {
                    anyhow::bail!("favorites_key cannot be empty");
                }
                self.favorites_key = value.trim().to_string();
            }
            "storage_timeout_ms" => {
                let timeout: u64 = value.parse().context("Invalid number")?;
                if timeout == 0 {
                    anyhow::bail!("storage_timeout_ms must be greater than zero");
                }
                self.storage_timeout_ms = timeout;
            }
            "messaging_scheme" => {
                if value.trim().is_empty() {
                    anyhow::bail!("messaging_scheme cannot be empty");
                }
                self.messaging_scheme = value.trim().to_string();
            }
            "log_to_file" => {
                self.log_to_file = value.parse().context("Invalid boolean value")?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "storage_path" => self.storage_path.clone(),
            "favorites_key" => Some(self.favorites_key.clone()),
            "storage_timeout_ms" => Some(self.storage_timeout_ms.to_string()),
            "messaging_scheme" => Some(self.messaging_scheme.clone()),
            "log_to_file" => Some(self.log_to_file.to_string()),
            _ => None,
        }
    }

    /// List all config values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            (
                "storage_path".to_string(),
                self.storage_path
                    .clone()
                    .unwrap_or_else(|| "(auto)".to_string()),
            ),
            ("favorites_key".to_string(), self.favorites_key.clone()),
            (
                "storage_timeout_ms".to_string(),
                format!("{}ms", self.storage_timeout_ms),
            ),
            ("messaging_scheme".to_string(), self.messaging_scheme.clone()),
            ("log_to_file".to_string(), self.log_to_file.to_string()),
        ]
    }
}
