//! # tunestats Common
//!
//! Shared entity types, errors, and logging for the tunestats workspace.
//!
//! This crate provides the foundational types used by the store, the
//! statistics engine, and the command line front end.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, StatsError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;
