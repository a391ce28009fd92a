//! Configuration management for Pantry
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_FILE_NAME, CONFIG_GENERATED, DEFAULT_EXPIRING_SOON_DAYS, MAX_AUTO_SYNC_INTERVAL_MINUTES,
    MAX_EXPIRING_SOON_DAYS,
};
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub remote: RemoteConfig,
    pub inventory: InventoryConfig,
    pub logging: LoggingConfig,
}

/// Local database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; defaults to `<data_dir>/pantry/pantry.db`
    pub database_path: Option<String>,
    /// Keep everything in memory (nothing survives the process)
    pub in_memory: bool,
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Auto-sync interval in minutes (0 = disabled, manual sync only)
    pub auto_sync_interval_minutes: u64,
}

/// Remote document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Store type: "file" or "memory"
    pub store_type: String,
    /// Root directory of the file store
    pub root_dir: String,
}

/// Inventory display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Items expiring within this many days count as "expiring soon"
    pub expiring_soon_days: i64,
    /// Unit used when none is given
    pub default_unit: String,
    /// Category used when none is given
    pub default_category: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable file logging
    pub enabled: bool,
    /// Level filter: "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync_interval_minutes: 15,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let root_dir = dirs::data_dir()
            .map(|dir| dir.join("pantry").join("remote"))
            .unwrap_or_else(|| PathBuf::from("pantry-remote"));
        Self {
            store_type: "file".to_string(),
            root_dir: root_dir.display().to_string(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
            default_unit: "pcs".to_string(),
            default_category: "Other".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("pantry").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sync.auto_sync_interval_minutes > MAX_AUTO_SYNC_INTERVAL_MINUTES {
            anyhow::bail!(
                "auto_sync_interval_minutes cannot exceed {} (24 hours)",
                MAX_AUTO_SYNC_INTERVAL_MINUTES
            );
        }

        if self.inventory.expiring_soon_days < 1 || self.inventory.expiring_soon_days > MAX_EXPIRING_SOON_DAYS {
            anyhow::bail!(
                "expiring_soon_days must be between 1 and {}, got {}",
                MAX_EXPIRING_SOON_DAYS,
                self.inventory.expiring_soon_days
            );
        }

        if self.inventory.default_unit.trim().is_empty() {
            anyhow::bail!("default_unit cannot be empty");
        }

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            anyhow::bail!("Invalid logging level '{}'", self.logging.level);
        }

        match self.remote.store_type.as_str() {
            "file" => {
                if self.remote.root_dir.trim().is_empty() {
                    anyhow::bail!("remote.root_dir cannot be empty for the file store");
                }
            }
            "memory" => {}
            other => anyhow::bail!("Unsupported remote store_type '{}'", other),
        }

        if !self.storage.in_memory {
            if let Some(path) = &self.storage.database_path {
                if path.trim().is_empty() {
                    anyhow::bail!("storage.database_path cannot be empty when set");
                }
            }
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# Pantry Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(datetime::DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("pantry"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
