//! Server configuration
//!
//! Loaded from a TOML file. Every section is optional and falls back to defaults,
//! and the `PORT` environment variable overrides `server.port`.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DietConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub planner: PlannerSection,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Persistence settings. Without a path the store lives in memory only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSection {
    /// JSON snapshot file, rewritten after every change
    pub path: Option<PathBuf>,
}

/// Meal plan generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerSection {
    /// Upper bound of food bank options per meal type (default: 6)
    #[serde(default = "default_max_options_per_meal")]
    pub max_options_per_meal: usize,
    /// Days in a generated plan (default: 7)
    #[serde(default = "default_days_per_week")]
    pub days_per_week: u8,
    /// Fixed RNG seed for reproducible plans
    pub seed: Option<u64>,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            max_options_per_meal: default_max_options_per_meal(),
            days_per_week: default_days_per_week(),
            seed: None,
        }
    }
}

fn default_max_options_per_meal() -> usize {
    6
}

fn default_days_per_week() -> u8 {
    7
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid value for {name}: {value}")]
    InvalidEnvVar { name: String, value: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DietConfig {
    /// Load configuration from a TOML file and apply environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: DietConfig = toml::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Defaults plus environment overrides, used when no file exists
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = DietConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.host.parse::<IpAddr>().map_err(|_| {
            ConfigError::InvalidConfig(format!(
                "server.host '{}' is not an IP address",
                self.server.host
            ))
        })?;

        if self.planner.max_options_per_meal == 0 {
            return Err(ConfigError::InvalidConfig(
                "planner.max_options_per_meal must be at least 1".to_string(),
            ));
        }

        if !(1..=7).contains(&self.planner.days_per_week) {
            return Err(ConfigError::InvalidConfig(
                "planner.days_per_week must be between 1 and 7".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address to bind. Only valid after [`DietConfig::validate`].
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidConfig(format!("bad host {}", self.server.host)))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
