//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tunestats_common::{LoggingConfig, StatsError, Timestamp};

use crate::defaults::MAX_WINDOW_DAYS;

/// Main configuration structure for tunestats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the entity data comes from.
    pub data: DataConfig,
    /// Aggregation settings.
    pub stats: StatsConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Data source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Seed dataset (YAML or JSON) loaded into the in-memory store.
    pub dataset_path: Option<PathBuf>,
}

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// How many users the engagement report lists as most active.
    pub most_active_users_limit: usize,
    /// Length of the short trending window in days.
    pub trending_week_days: u32,
    /// Length of the long trending window in days.
    pub trending_month_days: u32,
    /// Window of the daily activity timeline in days.
    pub timeline_window_days: u32,
    /// Length of each ranked list in the breakdown report.
    pub breakdown_limit: usize,
    /// Fixed reference instant for time-windowed reports; wall clock when absent.
    pub reference_time: Option<Timestamp>,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), StatsError> {
        self.stats.validate()?;

        if let Some(path) = &self.data.dataset_path {
            if path.as_os_str().is_empty() {
                return Err(StatsError::validation_field(
                    "dataset path cannot be empty",
                    "data.dataset_path",
                ));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(StatsError::validation_field(
                "log level cannot be empty",
                "logging.level",
            ));
        }

        Ok(())
    }
}

impl StatsConfig {
    /// Validates the aggregation settings.
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.most_active_users_limit == 0 {
            return Err(StatsError::validation_field(
                "most active users limit must be at least 1",
                "stats.most_active_users_limit",
            ));
        }

        if self.breakdown_limit == 0 {
            return Err(StatsError::validation_field(
                "breakdown limit must be at least 1",
                "stats.breakdown_limit",
            ));
        }

        for (field, days) in [
            ("stats.trending_week_days", self.trending_week_days),
            ("stats.trending_month_days", self.trending_month_days),
            ("stats.timeline_window_days", self.timeline_window_days),
        ] {
            if days == 0 {
                return Err(StatsError::validation_field(
                    "window length must be at least one day",
                    field,
                ));
            }
            if days > MAX_WINDOW_DAYS {
                return Err(StatsError::validation_field(
                    format!("window length must be at most {MAX_WINDOW_DAYS} days"),
                    field,
                ));
            }
        }

        Ok(())
    }
}
