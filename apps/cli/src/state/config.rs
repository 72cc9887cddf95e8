//! # App Configuration
//!
//! Configuration loaded once at startup, read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCANPRICE_API_BASE_URL=https://...                                 │
//! │     SCANPRICE_DB_PATH=/tmp/scanprice.db                                │
//! │     SCANPRICE_TIMEOUT_SECS=15                                          │
//! │     SCANPRICE_SCANNER_DEVICE=/dev/ttyACM0                              │
//! │                                                                         │
//! │  2. TOML Config File (--config, else platform default)                 │
//! │     ~/.config/scanprice/config.toml (Linux)                            │
//! │     ~/Library/Application Support/org.scanprice.scanprice/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [lookup]
//! api_base_url = "https://world.openfoodfacts.org/api/v0/product"
//! timeout_secs = 15
//!
//! [storage]
//! path = "/home/me/.local/share/scanprice/scanprice.db"
//! key = "barcode-scanner-storage"
//!
//! [scanner]
//! device = "/dev/ttyACM0"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use scanprice_core::HISTORY_STORAGE_KEY;
use scanprice_lookup::LookupConfig;

use crate::error::AppError;
use crate::scanner::ScannerConfig;

/// Database file name inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "scanprice.db";

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the history lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Platform data directory when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Key of the history record.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    HISTORY_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            path: None,
            key: default_storage_key(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete app configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Product database client settings.
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Barcode scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults (plus environment) if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            if let Err(e) = config.validate() {
                warn!("Environment overrides rejected: {}. Ignoring them.", e);
                return Self::default();
            }
            config
        })
    }

    /// Parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> Result<PathBuf, AppError> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AppError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AppError> {
        self.lookup
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        if self.storage.key.trim().is_empty() {
            return Err(AppError::Config("storage.key must not be empty".into()));
        }

        if self.scanner.fps == 0 {
            return Err(AppError::Config("scanner.fps must be greater than 0".into()));
        }

        let ratio = self.scanner.aspect_ratio;
        if ratio.is_nan() || ratio <= 0.0 {
            return Err(AppError::Config(
                "scanner.aspect_ratio must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SCANPRICE_API_BASE_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.lookup.api_base_url = url;
        }

        if let Some(path) = lookup("SCANPRICE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(secs) = lookup("SCANPRICE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.lookup.timeout_secs = Some(secs),
                Err(_) => warn!(value = %secs, "Ignoring non-numeric SCANPRICE_TIMEOUT_SECS"),
            }
        }

        if let Some(device) = lookup("SCANPRICE_SCANNER_DEVICE") {
            debug!(device = %device, "Overriding scanner device from environment");
            self.scanner.device = Some(PathBuf::from(device));
        }
    }

    /// Resolves the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/org.scanprice.scanprice/scanprice.db`
    /// - **Windows**: `%APPDATA%\scanprice\scanprice\data\scanprice.db`
    /// - **Linux**: `~/.local/share/scanprice/scanprice.db`
    pub fn database_path(&self) -> Result<PathBuf, AppError> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or_else(|| AppError::Config("Could not determine app data directory".into()))
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "scanprice", "scanprice")
}
