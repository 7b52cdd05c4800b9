//! # tunestats Store
//!
//! The read-side entity store consumed by the statistics engine, an
//! in-memory implementation, and the seed dataset loader.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod dataset;
pub mod store;

pub use dataset::{Dataset, DatasetFormat};
pub use store::{EntityStore, InMemoryStore};
