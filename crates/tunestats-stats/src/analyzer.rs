//! Analyzer trait shared by every report.

use serde::Serialize;
use tunestats_common::{Result, StatsError, Timestamp};

use crate::snapshot::Snapshot;

/// A stateless computation turning one snapshot into one report.
pub trait Analyzer: Send + Sync {
    /// The report this analyzer produces.
    type Report: Serialize + Send;

    /// Computes the report. Analyzers without time windows ignore `reference`.
    ///
    /// Fails only when a window cannot be placed before `reference`.
    fn analyze(&self, snapshot: &Snapshot, reference: Timestamp) -> Result<Self::Report>;

    /// Gets the name of this report.
    fn name(&self) -> &'static str;

    /// Gets a one-line description of this report.
    fn description(&self) -> &'static str;
}

/// Start of a window of `days` days ending at `reference`.
///
/// Errors when the start would fall before the earliest representable instant.
pub fn window_start(reference: Timestamp, days: u32) -> Result<Timestamp> {
    reference
        .checked_sub_signed(chrono::Duration::days(i64::from(days)))
        .ok_or_else(|| {
            StatsError::validation_field(
                format!("A window of {days} days ending at {reference} starts out of range"),
                "window_days",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunestats_common::test_utils::mock_timestamp;

    #[test]
    fn test_window_start() {
        let reference = mock_timestamp(2024, 1, 4, 0, 0, 0);
        assert_eq!(
            window_start(reference, 7).unwrap(),
            mock_timestamp(2023, 12, 28, 0, 0, 0)
        );
        assert_eq!(window_start(reference, 0).unwrap(), reference);
    }

    #[test]
    fn test_window_start_out_of_range() {
        let reference = mock_timestamp(2024, 1, 4, 0, 0, 0);
        let err = window_start(reference, 100_000_000).unwrap_err();
        assert!(matches!(err, StatsError::Validation { .. }));
        assert!(err.to_string().contains("100000000 days"));
    }
}
