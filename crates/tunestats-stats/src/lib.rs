//! # tunestats Stats
//!
//! The statistics aggregation engine: read-only computations that turn the
//! user, track and favorite collections into engagement, popularity,
//! preference, trending, timeline and breakdown reports.
//!
//! Every analyzer works on a [`Snapshot`] captured from an
//! [`EntityStore`](tunestats_store::EntityStore) and reduces it through the
//! shared functions in [`grouping`].
//!
//! ```no_run
//! use tunestats_stats::{ReferenceTime, StatisticsEngine};
//! use tunestats_store::{Dataset, InMemoryStore};
//!
//! # fn main() -> tunestats_common::Result<()> {
//! let store = InMemoryStore::from_dataset(Dataset::load("seed.yaml")?);
//! let engine = StatisticsEngine::new(store);
//! let trending = engine.trending(ReferenceTime::Now)?;
//! println!("{}", serde_json::to_string_pretty(&trending)?);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod analyzer;
pub mod breakdown;
pub mod engagement;
pub mod engine;
pub mod grouping;
pub mod popularity;
pub mod preference;
pub mod reports;
pub mod response;
pub mod snapshot;
pub mod timeline;
pub mod trend;

pub use analyzer::Analyzer;
pub use breakdown::BreakdownAnalyzer;
pub use engagement::EngagementAnalyzer;
pub use engine::{ReferenceTime, StatisticsEngine};
pub use grouping::Groups;
pub use popularity::PopularityAnalyzer;
pub use preference::PreferenceAnalyzer;
pub use reports::*;
pub use response::{ArrayResponse, ObjectResponse, RESPONSE_VERSION};
pub use snapshot::{FavoriteView, Snapshot};
pub use timeline::TimelineAnalyzer;
pub use trend::TrendAnalyzer;
