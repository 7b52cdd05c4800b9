//! Default values for every configuration section.

use crate::schema::*;
use tunestats_common::LoggingConfig;

/// Users listed by the engagement report.
pub const DEFAULT_MOST_ACTIVE_USERS_LIMIT: usize = 5;
/// Short trending window.
pub const DEFAULT_TRENDING_WEEK_DAYS: u32 = 7;
/// Long trending window.
pub const DEFAULT_TRENDING_MONTH_DAYS: u32 = 30;
/// Daily activity window.
pub const DEFAULT_TIMELINE_WINDOW_DAYS: u32 = 7;
/// Longest accepted time window, roughly a century.
pub const MAX_WINDOW_DAYS: u32 = 36_500;
/// Ranked list length in the breakdown report.
pub const DEFAULT_BREAKDOWN_LIMIT: usize = 3;

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            stats: StatsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { dataset_path: None }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            most_active_users_limit: DEFAULT_MOST_ACTIVE_USERS_LIMIT,
            trending_week_days: DEFAULT_TRENDING_WEEK_DAYS,
            trending_month_days: DEFAULT_TRENDING_MONTH_DAYS,
            timeline_window_days: DEFAULT_TIMELINE_WINDOW_DAYS,
            breakdown_limit: DEFAULT_BREAKDOWN_LIMIT,
            reference_time: None,
        }
    }
}
