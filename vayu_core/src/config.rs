//! Configuration file support for Vayu.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/vayu/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current measures for the Kathmandu AirGradient monitor
pub const DEFAULT_API_URL: &str =
    "https://api.airgradient.com/public/api/v1/world/locations/58525/measures/current";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub map: MapConfig,
}

/// Upstream API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

/// Dashboard refresh and display configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_exposure_hours")]
    pub exposure_hours: f64,

    /// CSV of daily PM2.5 averages; the built-in sample week is used if unset
    #[serde(default)]
    pub history_csv: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            exposure_hours: default_exposure_hours(),
            history_csv: None,
        }
    }
}

/// Global dataset configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct MapConfig {
    #[serde(default)]
    pub dataset_csv: Option<PathBuf>,
}

// Default value functions
fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_exposure_hours() -> f64 {
    24.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            config_path => {
                tracing::info!(
                    "No config file found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("vayu").join("config.toml"))
    }

    /// Reject values the dashboard cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.source.api_url.trim().is_empty() {
            return Err(Error::Config("source.api_url must not be empty".into()));
        }
        if self.dashboard.refresh_interval_secs == 0 {
            return Err(Error::Config(
                "dashboard.refresh_interval_secs must be at least 1".into(),
            ));
        }
        let hours = self.dashboard.exposure_hours;
        if !hours.is_finite() || hours < 0.0 {
            return Err(Error::Config(format!(
                "dashboard.exposure_hours must be a non-negative number, got {}",
                hours
            )));
        }
        Ok(())
    }
}
