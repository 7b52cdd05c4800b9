//! # tunestats Config
//!
//! Configuration schema, defaults and loading for tunestats.
//!
//! Settings come from a YAML or TOML file with `TUNESTATS_*` environment
//! overrides layered on top, and are validated before use.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
