//! Per-track and per-genre popularity.

use tracing::{debug, instrument};
use tunestats_common::{Result, Timestamp};

use crate::analyzer::Analyzer;
use crate::grouping::{fold_by, mean_by};
use crate::reports::{PopularityReport, TrackWithCount};
use crate::snapshot::{FavoriteView, Snapshot};

/// Counts favorites per track, keyed on the track's identity and display
/// fields, in order of each track's first favorite.
pub fn count_by_track<'a>(views: impl IntoIterator<Item = FavoriteView<'a>>) -> Vec<TrackWithCount> {
    fold_by(
        views,
        |view| {
            let track = view.track;
            (
                &track.id,
                track.name.as_str(),
                track.artists.as_str(),
                track.genre.as_str(),
                track.popularity,
            )
        },
        || None,
        |slot: &mut Option<TrackWithCount>, view| {
            slot.get_or_insert_with(|| TrackWithCount::new(view.track, 0)).count += 1;
        },
    )
    .into_iter()
    .filter_map(|(_, entry)| entry)
    .collect()
}

/// Favorite counts per track and rating statistics per genre.
#[derive(Debug, Clone, Default)]
pub struct PopularityAnalyzer;

impl PopularityAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for PopularityAnalyzer {
    type Report = PopularityReport;

    #[instrument(skip_all)]
    fn analyze(&self, snapshot: &Snapshot, _reference: Timestamp) -> Result<PopularityReport> {
        let most_favorited_tracks = count_by_track(snapshot.views());

        let average_rating_by_genre = mean_by(
            snapshot.views(),
            |view| view.track.genre.clone(),
            |view| view.favorite.rating.as_f64(),
        )
        .into_btree_map();

        let feature_correlations = mean_by(
            snapshot.views(),
            |view| view.track.genre.clone(),
            |view| view.favorite.rating.as_f64() * view.track.features.danceability,
        )
        .into_btree_map();

        debug!(
            "Popularity over {} favorites: {} tracks, {} genres",
            snapshot.favorites().len(),
            most_favorited_tracks.len(),
            average_rating_by_genre.len()
        );

        Ok(PopularityReport {
            most_favorited_tracks,
            average_rating_by_genre,
            feature_correlations,
        })
    }

    fn name(&self) -> &'static str {
        "popularity"
    }

    fn description(&self) -> &'static str {
        "Favorite counts per track, average rating and rating-weighted danceability per genre"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunestats_common::test_utils::{assert_approx_eq, favorite, mock_timestamp, reference_scenario, track, user};

    #[test]
    fn test_reference_scenario() {
        let scenario = reference_scenario();
        let snapshot =
            Snapshot::from_parts(scenario.users, scenario.tracks, scenario.favorites).unwrap();
        let report = PopularityAnalyzer::new().analyze(&snapshot, mock_timestamp(2024, 1, 4, 0, 0, 0)).unwrap();

        let counts: Vec<_> = report
            .most_favorited_tracks
            .iter()
            .map(|t| (t.id.as_str(), t.count))
            .collect();
        assert_eq!(counts, vec![("t1", 2), ("t2", 1)]);
        assert_eq!(report.most_favorited_tracks[0].artist, "Artist t1");
        assert_eq!(report.most_favorited_tracks[0].genre, "Pop");

        assert_approx_eq(report.average_rating_by_genre["Pop"], 4.5, 1e-9);
        assert_approx_eq(report.average_rating_by_genre["Rock"], 3.0, 1e-9);
        // (5 × 0.8 + 4 × 0.8) / 2 and 3 × 0.5
        assert_approx_eq(report.feature_correlations["Pop"], 3.6, 1e-9);
        assert_approx_eq(report.feature_correlations["Rock"], 1.5, 1e-9);
    }

    #[test]
    fn test_track_order_follows_first_favorite() {
        let snapshot = Snapshot::from_parts(
            vec![user(1, "a", "USA")],
            vec![track("t1", "Pop", 0.1), track("t2", "Pop", 0.2), track("t3", "Jazz", 0.3)],
            vec![
                favorite(1, 1, "t3", 1, None),
                favorite(2, 1, "t1", 2, None),
                favorite(3, 1, "t3", 3, None),
            ],
        )
        .unwrap();

        let tracks = count_by_track(snapshot.views());
        let ids: Vec<_> = tracks.iter().map(|t| (t.id.as_str(), t.count)).collect();
        assert_eq!(ids, vec![("t3", 2), ("t1", 1)]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::from_parts(Vec::new(), Vec::new(), Vec::new()).unwrap();
        let report = PopularityAnalyzer::new().analyze(&snapshot, mock_timestamp(2024, 1, 4, 0, 0, 0)).unwrap();
        assert!(report.most_favorited_tracks.is_empty());
        assert!(report.average_rating_by_genre.is_empty());
        assert!(report.feature_correlations.is_empty());
    }
}
