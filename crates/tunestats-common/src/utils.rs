//! Shared utility functions.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Result, StatsError};
use crate::types::Timestamp;

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parses a reference instant.
///
/// Accepts RFC 3339 (`2024-01-04T00:00:00Z`), a naive date-time read as UTC
/// (`2024-01-04T00:00:00` or `2024-01-04 00:00:00`), or a bare date read as
/// UTC midnight.
pub fn parse_timestamp(input: &str) -> Result<Timestamp> {
    let input = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| StatsError::validation_field(format!("unrecognized timestamp '{input}'"), "timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(timestamp), "2024-01-01 12:00:00 UTC");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-04T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-04T01:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-04T00:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-04 00:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2024-01-04 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2024-13-01").is_err());
    }
}
