//! Configuration for Rossi-alpha analysis runs.

use crate::core::ScanSettings;
use crate::events::LoadOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window, binning and policy settings
    pub analysis: ScanSettings,

    /// Anchor-range partitions per stream for parallel Type I scans
    pub partitions: usize,

    /// Multiplier converting event file times into nanoseconds
    pub time_scale: f64,

    /// Path for exported histograms
    pub export_path: PathBuf,

    /// Path for the run log and other state
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rossi-alpha");

        Self {
            analysis: ScanSettings::default(),
            partitions: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            time_scale: 1.0,
            export_path: data_dir.join("exports"),
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rossi-alpha")
            .join("config.json")
    }

    /// Path of the persisted run log.
    pub fn run_log_path(&self) -> PathBuf {
        self.data_path.join("runs.json")
    }

    /// Loader options derived from this configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            time_scale: self.time_scale,
        }
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.export_path)?;
        std::fs::create_dir_all(&self.data_path)?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
