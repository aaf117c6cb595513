use chrono::{DateTime, Duration, NaiveDate, Utc};
use co2_utils::dates::{end_of_day, start_of_day};

/// Start of the default reporting window used by the projects overview and CI/CD views.
pub const DATE_BEGIN: (i32, u32, u32) = (2024, 7, 4);

/// End of the default reporting window used by the projects overview and CI/CD views.
pub const DATE_END: (i32, u32, u32) = (2024, 7, 25);

/// A time window owned by a single view.
///
/// The window is sent to the API as `startDate`/`endDate` and reused on the
/// client to narrow the returned records. Client-side filtering excludes both
/// bounds, see [`DateRange::contains`].
#[derive(Clone, Eq, PartialEq, Copy, Debug, Hash)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From the start of `first` through the last millisecond of `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self::new(start_of_day(first), end_of_day(last))
    }

    /// The `n` days before `now` plus today, day-aligned.
    pub fn last_days(n: i64, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self::days(today - Duration::days(n), today)
    }

    /// True when `ts` lies strictly inside the window.
    ///
    /// A record stamped exactly on either bound is outside.
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start < *ts && *ts < self.end
    }

    /// True when no timestamp can satisfy [`DateRange::contains`].
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Move the start to the beginning of `date`, keeping the end.
    pub fn with_start_day(self, date: NaiveDate) -> Self {
        Self::new(start_of_day(date), self.end)
    }

    /// Move the end to the last millisecond of `date`, keeping the start.
    pub fn with_end_day(self, date: NaiveDate) -> Self {
        Self::new(self.start, end_of_day(date))
    }
}

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Default windows per view.
pub mod windows {
    use super::{ymd, DateRange, DATE_BEGIN, DATE_END};
    use chrono::{DateTime, Utc};

    /// Projects overview and CI/CD pipeline list.
    pub fn reporting() -> DateRange {
        DateRange::days(ymd(DATE_BEGIN), ymd(DATE_END))
    }

    /// Single project (SDLC breakdown) and operations views.
    pub fn project() -> DateRange {
        DateRange::days(ymd((2024, 5, 16)), ymd((2024, 7, 16)))
    }

    /// Initial value of the date pickers on grouped history charts.
    pub fn chart() -> DateRange {
        DateRange::days(ymd((2024, 5, 16)), ymd((2024, 7, 25)))
    }

    /// Single pipeline view.
    pub fn pipeline() -> DateRange {
        DateRange::days(ymd((2024, 7, 3)), ymd(DATE_END))
    }

    /// Single infrastructure element view: the last 30 days.
    pub fn infrastructure_element(now: DateTime<Utc>) -> DateRange {
        DateRange::last_days(30, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use co2_utils::dates::{format_timestamp, parse_timestamp};

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_contains_excludes_both_bounds() {
        let range = DateRange::new(ts("2024-07-01"), ts("2024-07-03"));
        assert!(!range.contains(&ts("2024-07-01")));
        assert!(range.contains(&ts("2024-07-02")));
        assert!(!range.contains(&ts("2024-07-03")));
        assert!(!range.contains(&ts("2024-06-30")));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = DateRange::new(ts("2024-07-03"), ts("2024-07-01"));
        assert!(range.is_empty());
        assert!(!range.contains(&ts("2024-07-02")));
        let same = DateRange::new(ts("2024-07-01"), ts("2024-07-01"));
        assert!(same.is_empty());
    }

    #[test]
    fn test_days_spans_whole_days() {
        let range = DateRange::days(ymd((2024, 7, 4)), ymd((2024, 7, 25)));
        assert_eq!(format_timestamp(&range.start), "2024-07-04T00:00:00.000Z");
        assert_eq!(format_timestamp(&range.end), "2024-07-25T23:59:59.999Z");
        // Midnight of the first day is the exclusive lower bound
        assert!(!range.contains(&ts("2024-07-04")));
        assert!(range.contains(&ts("2024-07-25")));
    }

    #[test]
    fn test_last_days() {
        let now = ts("2024-08-15T13:45:00Z");
        let range = DateRange::last_days(30, now);
        assert_eq!(format_timestamp(&range.start), "2024-07-16T00:00:00.000Z");
        assert_eq!(format_timestamp(&range.end), "2024-08-15T23:59:59.999Z");
    }

    #[test]
    fn test_with_start_and_end_day() {
        let range = windows::chart()
            .with_start_day(ymd((2024, 6, 1)))
            .with_end_day(ymd((2024, 6, 30)));
        assert_eq!(format_timestamp(&range.start), "2024-06-01T00:00:00.000Z");
        assert_eq!(format_timestamp(&range.end), "2024-06-30T23:59:59.999Z");
    }

    #[test]
    fn test_default_windows() {
        assert_eq!(windows::reporting().start, ts("2024-07-04"));
        assert_eq!(windows::project().end, ts("2024-07-16T23:59:59.999Z"));
        assert_eq!(windows::pipeline().start, ts("2024-07-03"));
        assert!(!windows::chart().is_empty());
    }
}
