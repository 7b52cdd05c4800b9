//! Application-wide error types using thiserror.

use tunestats_common::StatsError;
use tunestats_config::ConfigError;

/// Main CLI error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Engine, store or logging error.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Configuration loading error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No dataset was named on the command line or in the configuration.
    #[error("No dataset configured; pass --dataset or set data.dataset_path")]
    MissingDataset,

    /// Report rendering error.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    /// A report task panicked or was cancelled.
    #[error("Report task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the CLI application.
pub type CliResult<T> = Result<T, CliError>;
