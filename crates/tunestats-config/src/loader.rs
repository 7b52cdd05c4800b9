//! Configuration loading utilities

use crate::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use tunestats_common::{parse_timestamp, Result as StatsResult, StatsError};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "TUNESTATS_CONFIG_PATH";

/// Files probed in the working directory when no path is given.
const DEFAULT_CONFIG_FILES: [&str; 3] = ["tunestats.yaml", "tunestats.yml", "tunestats.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[source] StatsError),
}

impl From<ConfigError> for StatsError {
    fn from(err: ConfigError) -> Self {
        StatsError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::parse_file(path)?;
        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate().map_err(ConfigError::ValidationError)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from `TUNESTATS_CONFIG_PATH`, a default file in the
    /// working directory, or built-in defaults, in that order.
    pub fn load() -> StatsResult<Config> {
        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            return Ok(Self::load_config(config_path)?);
        }

        if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
        {
            return Ok(Self::load_config(path)?);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// Parse a configuration file without applying overrides or validation
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Apply `TUNESTATS_*` overrides read through `lookup`
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("TUNESTATS_DATASET") {
            config.data.dataset_path = Some(PathBuf::from(path));
        }

        if let Some(level) = lookup("TUNESTATS_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(limit) = lookup("TUNESTATS_MOST_ACTIVE_LIMIT") {
            config.stats.most_active_users_limit =
                limit.trim().parse().map_err(|e| ConfigError::EnvParseError {
                    var: "TUNESTATS_MOST_ACTIVE_LIMIT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(instant) = lookup("TUNESTATS_REFERENCE_TIME") {
            config.stats.reference_time =
                Some(parse_timestamp(&instant).map_err(|e| ConfigError::EnvParseError {
                    var: "TUNESTATS_REFERENCE_TIME".to_string(),
                    source: Box::new(e),
                })?);
        }

        Ok(())
    }
}
