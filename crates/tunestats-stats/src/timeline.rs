//! Time-bucketed activity summary.

use chrono::{Datelike, Timelike};
use tracing::{debug, instrument};
use tunestats_common::{DayOfWeek, Result, Timestamp};
use tunestats_config::DEFAULT_TIMELINE_WINDOW_DAYS;

use crate::analyzer::{window_start, Analyzer};
use crate::grouping::count_by;
use crate::reports::TimelineReport;
use crate::snapshot::Snapshot;

/// Buckets last-played instants by calendar date, hour of day and weekday.
///
/// Only the daily series is limited to the recent window; the hour and weekday
/// histograms cover every favorite that has been played.
#[derive(Debug, Clone)]
pub struct TimelineAnalyzer {
    window_days: u32,
}

impl TimelineAnalyzer {
    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }
}

impl Default for TimelineAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TIMELINE_WINDOW_DAYS)
    }
}

impl Analyzer for TimelineAnalyzer {
    type Report = TimelineReport;

    #[instrument(skip(self, snapshot), fields(window_days = self.window_days))]
    fn analyze(&self, snapshot: &Snapshot, reference: Timestamp) -> Result<TimelineReport> {
        let start = window_start(reference, self.window_days)?;
        let played = || snapshot.favorites().iter().filter_map(|f| f.last_played);

        let daily_activity = count_by(played().filter(|instant| *instant > start), |instant| {
            instant.date_naive()
        })
        .into_btree_map();

        let peak_activity_hours = count_by(played(), |instant| instant.hour()).into_btree_map();

        let weekly_patterns =
            count_by(played(), |instant| DayOfWeek::from(instant.weekday())).into_btree_map();

        debug!(
            "Timeline: {} active days, {} active hours",
            daily_activity.len(),
            peak_activity_hours.len()
        );

        Ok(TimelineReport {
            daily_activity,
            peak_activity_hours,
            weekly_patterns,
        })
    }

    fn name(&self) -> &'static str {
        "timeline"
    }

    fn description(&self) -> &'static str {
        "Plays per recent day, per hour of day and per weekday"
    }
}
