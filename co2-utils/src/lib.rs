//! Shared utility functions for CO2 dashboard crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Parse an ISO-8601 timestamp as sent by the metrics API.
    ///
    /// Accepts RFC 3339 (`2024-07-01T00:00:00.000Z`, with any offset),
    /// offset-less date-times (`2024-07-01T08:30:00`, `2024-07-01 08:30:00`),
    /// which are read as UTC, and bare dates (`2024-07-01`), which map to
    /// midnight UTC.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Utc.from_utc_datetime(&naive));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(start_of_day(date));
        }
        Err(DateError(format!("unrecognized timestamp '{}'", s)).into())
    }

    /// Format a timestamp the way browsers print `Date.toISOString()`:
    /// UTC with millisecond precision and a `Z` suffix.
    pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Midnight UTC at the start of `date`.
    pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
    }

    /// The last millisecond of `date` in UTC.
    pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
        // 23:59:59.999 always exists
        let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        Utc.from_utc_datetime(&date.and_time(time))
    }

    /// Short x-axis label, e.g. "Jul 04".
    pub fn axis_label(ts: &DateTime<Utc>) -> String {
        ts.format("%b %d").to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, Timelike};

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2024-07-04");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_timestamp_rfc3339() {
            let ts = parse_timestamp("2024-07-01T10:15:00.000Z").unwrap();
            assert_eq!(ts.day(), 1);
            assert_eq!(ts.hour(), 10);
            assert_eq!(ts.minute(), 15);
        }

        #[test]
        fn test_parse_timestamp_with_offset_normalizes_to_utc() {
            let ts = parse_timestamp("2024-07-01T02:00:00+02:00").unwrap();
            assert_eq!(ts.hour(), 0);
            assert_eq!(ts.day(), 1);
        }

        #[test]
        fn test_parse_timestamp_naive_and_bare_date() {
            let naive = parse_timestamp("2024-07-01T08:30:00").unwrap();
            assert_eq!(naive.hour(), 8);
            let spaced = parse_timestamp("2024-07-01 08:30:00").unwrap();
            assert_eq!(naive, spaced);
            let bare = parse_timestamp("2024-07-01").unwrap();
            assert_eq!(bare, start_of_day(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
        }

        #[test]
        fn test_parse_timestamp_rejects_garbage() {
            assert!(parse_timestamp("yesterday").is_err());
            assert!(parse_timestamp("").is_err());
        }

        #[test]
        fn test_format_timestamp_matches_iso_string() {
            let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
            assert_eq!(format_timestamp(&start_of_day(date)), "2024-07-04T00:00:00.000Z");
            assert_eq!(format_timestamp(&end_of_day(date)), "2024-07-04T23:59:59.999Z");
        }

        #[test]
        fn test_axis_label() {
            let ts = parse_timestamp("2024-07-04").unwrap();
            assert_eq!(axis_label(&ts), "Jul 04");
        }
    }
}

/// Display formatting for measurements
pub mod format {
    /// Format a duration given in milliseconds as "HH:MM:SS".
    ///
    /// Hours are not wrapped, so a 25 hour run prints as "25:00:00".
    pub fn format_duration_ms(ms: u64) -> String {
        let seconds = ms / 1000;
        let minutes = seconds / 60;
        let hours = minutes / 60;
        format!("{:02}:{:02}:{:02}", hours, minutes % 60, seconds % 60)
    }

    /// Format a CO2 amount in grams with two decimals, e.g. "12.35g CO2e".
    pub fn format_grams(value: f64) -> String {
        format!("{:.2}g CO2e", value)
    }

    /// Grams shown as kilograms with three decimals, e.g. "~0.812 kg CO2e" for 812.4 g.
    pub fn format_kilograms(grams: f64) -> String {
        format!("~{:.3} kg CO2e", grams / 1000.0)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_duration_ms() {
            assert_eq!(format_duration_ms(0), "00:00:00");
            assert_eq!(format_duration_ms(59_999), "00:00:59");
            assert_eq!(format_duration_ms(61_000), "00:01:01");
            assert_eq!(format_duration_ms(3_723_000), "01:02:03");
            assert_eq!(format_duration_ms(90_000_000), "25:00:00");
        }

        #[test]
        fn test_format_grams() {
            assert_eq!(format_grams(12.346), "12.35g CO2e");
            assert_eq!(format_grams(0.0), "0.00g CO2e");
        }

        #[test]
        fn test_format_kilograms() {
            assert_eq!(format_kilograms(812.4), "~0.812 kg CO2e");
            assert_eq!(format_kilograms(1500.0), "~1.500 kg CO2e");
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
