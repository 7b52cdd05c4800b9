//! # tunestats CLI
//!
//! Loads configuration and a seed dataset, then prints statistics reports as
//! JSON wrapped in a versioned response envelope.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod error;
pub mod runner;

pub use cli::{Cli, OutputFormat, ReportKind};
pub use error::{CliError, CliResult};
pub use runner::{render, ReportRunner};
