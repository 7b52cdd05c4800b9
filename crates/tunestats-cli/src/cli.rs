//! Command line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use tunestats_common::{parse_timestamp, Timestamp};
use tunestats_config::Config;

/// Listening statistics over users, tracks and their favorites
#[derive(Parser, Debug)]
#[command(name = "tunestats", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed dataset (YAML or JSON); overrides data.dataset_path
    #[arg(short, long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Reference instant for time-windowed reports; defaults to now
    #[arg(long, value_name = "RFC3339", value_parser = parse_reference)]
    pub at: Option<Timestamp>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Log level filter; overrides logging.level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Report to print
    #[command(subcommand)]
    pub report: ReportKind,
}

/// Reports the CLI can print.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Average favorites per user, most active users, favorites per genre
    Engagement,
    /// Favorite counts per track, rating statistics per genre
    Popularity,
    /// Genre counts and average danceability per country
    Preferences,
    /// Tracks, genres and countries active in the recent windows
    Trending,
    /// Plays per recent day, hour of day and weekday
    Timeline,
    /// Rating, country and genre breakdowns
    Breakdown,
    /// Every report against one reference instant
    All,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Engagement => "engagement",
            Self::Popularity => "popularity",
            Self::Preferences => "preferences",
            Self::Trending => "trending",
            Self::Timeline => "timeline",
            Self::Breakdown => "breakdown",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

/// How reports are written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Indented JSON
    Pretty,
}

impl Cli {
    /// Layers command line flags over the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dataset) = &self.dataset {
            config.data.dataset_path = Some(dataset.clone());
        }
        if let Some(at) = self.at {
            config.stats.reference_time = Some(at);
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn parse_reference(input: &str) -> Result<Timestamp, String> {
    parse_timestamp(input).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tunestats_common::test_utils::mock_timestamp;

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "tunestats",
            "--config",
            "tunestats.toml",
            "--dataset",
            "seed.yaml",
            "--at",
            "2024-01-04T00:00:00Z",
            "--format",
            "json",
            "trending",
        ])
        .unwrap();

        assert_eq!(cli.report, ReportKind::Trending);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.at, Some(mock_timestamp(2024, 1, 4, 0, 0, 0)));

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.data.dataset_path, Some(PathBuf::from("seed.yaml")));
        assert_eq!(config.stats.reference_time, Some(mock_timestamp(2024, 1, 4, 0, 0, 0)));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_defaults_and_errors() {
        let cli = Cli::try_parse_from(["tunestats", "all"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.at.is_none());
        assert_eq!(cli.report.to_string(), "all");

        assert!(Cli::try_parse_from(["tunestats"]).is_err());
        assert!(Cli::try_parse_from(["tunestats", "--at", "yesterday", "all"]).is_err());
        assert!(Cli::try_parse_from(["tunestats", "charts"]).is_err());
    }
}
