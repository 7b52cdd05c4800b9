//! Per-country taste summary.

use tracing::{debug, instrument};
use tunestats_common::{Result, Timestamp};

use crate::analyzer::Analyzer;
use crate::grouping::{fold_by, mean_by, Groups};
use crate::reports::PreferenceReport;
use crate::snapshot::Snapshot;

/// Genre counts and average danceability per user country.
#[derive(Debug, Clone, Default)]
pub struct PreferenceAnalyzer;

impl PreferenceAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for PreferenceAnalyzer {
    type Report = PreferenceReport;

    #[instrument(skip_all)]
    fn analyze(&self, snapshot: &Snapshot, _reference: Timestamp) -> Result<PreferenceReport> {
        // Grouped through users so that countries without favorites still appear.
        let genre_preferences_by_country = fold_by(
            snapshot.users(),
            |user| user.country.clone(),
            Groups::<String, u64>::new,
            |genres, user| {
                for view in snapshot.favorites_of(user.id) {
                    *genres.entry_or_insert_with(view.track.genre.clone(), || 0) += 1;
                }
            },
        )
        .map_values(Groups::into_btree_map)
        .into_btree_map();

        let average_features_by_country = mean_by(
            snapshot.views(),
            |view| view.user.country.clone(),
            |view| view.track.features.danceability,
        )
        .into_btree_map();

        debug!(
            "Preferences over {} countries",
            genre_preferences_by_country.len()
        );

        Ok(PreferenceReport {
            genre_preferences_by_country,
            average_features_by_country,
        })
    }

    fn name(&self) -> &'static str {
        "preferences"
    }

    fn description(&self) -> &'static str {
        "Genre favorite counts and average danceability per country"
    }
}
