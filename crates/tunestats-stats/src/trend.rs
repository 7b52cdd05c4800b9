//! Time-windowed "what's hot now" summary.

use tracing::{debug, instrument};
use tunestats_common::{Result, Timestamp};
use tunestats_config::{DEFAULT_TRENDING_MONTH_DAYS, DEFAULT_TRENDING_WEEK_DAYS};

use crate::analyzer::{window_start, Analyzer};
use crate::grouping::count_by;
use crate::popularity::count_by_track;
use crate::reports::TrendingReport;
use crate::snapshot::Snapshot;

/// Counts favorites played within a week or a month of the reference instant.
///
/// A favorite falls in a window when its `last_played` is strictly after the
/// window start; favorites never played are in no window.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    week_days: u32,
    month_days: u32,
}

impl TrendAnalyzer {
    pub fn new(week_days: u32, month_days: u32) -> Self {
        Self {
            week_days,
            month_days,
        }
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TRENDING_WEEK_DAYS, DEFAULT_TRENDING_MONTH_DAYS)
    }
}

impl Analyzer for TrendAnalyzer {
    type Report = TrendingReport;

    #[instrument(skip(self, snapshot), fields(week_days = self.week_days, month_days = self.month_days))]
    fn analyze(&self, snapshot: &Snapshot, reference: Timestamp) -> Result<TrendingReport> {
        let week_start = window_start(reference, self.week_days)?;
        let month_start = window_start(reference, self.month_days)?;

        let in_week = || {
            snapshot
                .views()
                .filter(move |view| view.favorite.played_after(week_start))
        };

        let recently_popular_tracks = count_by_track(in_week());

        let emerging_genres = count_by(
            snapshot
                .views()
                .filter(|view| view.favorite.played_after(month_start)),
            |view| view.track.genre.clone(),
        )
        .into_btree_map();

        let user_activity_by_country =
            count_by(in_week(), |view| view.user.country.clone()).into_btree_map();

        debug!(
            "Trending: {} tracks this week, {} genres this month",
            recently_popular_tracks.len(),
            emerging_genres.len()
        );

        Ok(TrendingReport {
            recently_popular_tracks,
            emerging_genres,
            user_activity_by_country,
        })
    }

    fn name(&self) -> &'static str {
        "trending"
    }

    fn description(&self) -> &'static str {
        "Tracks, genres and countries active within the recent windows"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunestats_common::test_utils::{favorite, mock_timestamp, reference_scenario, track, user};

    #[test]
    fn test_reference_scenario() {
        let scenario = reference_scenario();
        let snapshot =
            Snapshot::from_parts(scenario.users, scenario.tracks, scenario.favorites).unwrap();
        let report = TrendAnalyzer::default().analyze(&snapshot, mock_timestamp(2024, 1, 4, 0, 0, 0)).unwrap();

        let tracks: Vec<_> = report
            .recently_popular_tracks
            .iter()
            .map(|t| (t.id.as_str(), t.count))
            .collect();
        assert_eq!(tracks, vec![("t1", 2), ("t2", 1)]);
        assert_eq!(report.emerging_genres.get("Pop"), Some(&2));
        assert_eq!(report.emerging_genres.get("Rock"), Some(&1));
        assert_eq!(report.user_activity_by_country.get("USA"), Some(&2));
        assert_eq!(report.user_activity_by_country.get("UK"), Some(&1));
    }

    #[test]
    fn test_window_boundaries() {
        let reference = mock_timestamp(2024, 2, 1, 12, 0, 0);
        let snapshot = Snapshot::from_parts(
            vec![user(1, "a", "USA")],
            vec![track("t1", "Pop", 0.5), track("t2", "Jazz", 0.5)],
            vec![
                // exactly on the week start: excluded from the week, inside the month
                favorite(1, 1, "t1", 4, Some(mock_timestamp(2024, 1, 25, 12, 0, 0))),
                // one second later: inside both
                favorite(2, 1, "t1", 4, Some(mock_timestamp(2024, 1, 25, 12, 0, 1))),
                // exactly on the month start: excluded everywhere
                favorite(3, 1, "t2", 4, Some(mock_timestamp(2024, 1, 2, 12, 0, 0))),
                // never played
                favorite(4, 1, "t2", 4, None),
            ],
        )
        .unwrap();

        let report = TrendAnalyzer::default().analyze(&snapshot, reference).unwrap();
        assert_eq!(report.recently_popular_tracks.len(), 1);
        assert_eq!(report.recently_popular_tracks[0].count, 1);
        assert_eq!(report.emerging_genres.get("Pop"), Some(&2));
        assert_eq!(report.emerging_genres.get("Jazz"), None);
        assert_eq!(report.user_activity_by_country.get("USA"), Some(&1));
    }

    #[test]
    fn test_custom_windows() {
        let scenario = reference_scenario();
        let snapshot =
            Snapshot::from_parts(scenario.users, scenario.tracks, scenario.favorites).unwrap();
        let report = TrendAnalyzer::new(1, 2).analyze(&snapshot, mock_timestamp(2024, 1, 4, 12, 0, 0)).unwrap();

        // Week window starts 2024-01-03 12:00, so only the 14:00 and 22:00 plays count.
        assert_eq!(report.user_activity_by_country.get("USA"), Some(&1));
        assert_eq!(report.user_activity_by_country.get("UK"), Some(&1));
        assert_eq!(report.emerging_genres.values().sum::<u64>(), 3);
    }

    #[test]
    fn test_window_before_representable_range_errors() {
        let scenario = reference_scenario();
        let snapshot =
            Snapshot::from_parts(scenario.users, scenario.tracks, scenario.favorites).unwrap();
        let err = TrendAnalyzer::new(7, 100_000_000)
            .analyze(&snapshot, mock_timestamp(2024, 1, 4, 0, 0, 0))
            .unwrap_err();
        assert!(err.to_string().starts_with("Validation error"));
    }
}
