//! Group flat records into date-aligned chart series.
//!
//! Every chart in the dashboard draws from the same shape: one shared,
//! sorted date axis and, per group, one point per axis date. Missing
//! measurements are `None`, never zero.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Projection shared by every historical record type.
pub trait SeriesRecord {
    fn date(&self) -> DateTime<Utc>;
    /// Label of the series this record belongs to.
    fn group_key(&self) -> String;
    /// Grams CO2e
    fn value(&self) -> f64;
}

/// A record already reduced to its projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRecord {
    pub date: DateTime<Utc>,
    pub group_key: String,
    pub value: f64,
}

impl TimeSeriesRecord {
    pub fn new(date: DateTime<Utc>, group_key: impl Into<String>, value: f64) -> Self {
        Self {
            date,
            group_key: group_key.into(),
            value,
        }
    }

    pub fn from_record<R: SeriesRecord>(record: &R) -> Self {
        Self::new(record.date(), record.group_key(), record.value())
    }
}

impl SeriesRecord for TimeSeriesRecord {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn group_key(&self) -> String {
        self.group_key.clone()
    }

    fn value(&self) -> f64 {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: DateTime<Utc>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

/// Output of [`reshape`]: the shared date axis plus one dense series per group.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Reshaped {
    pub dates: Vec<DateTime<Utc>>,
    pub series: Vec<ChartSeries>,
}

impl Reshaped {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.series.is_empty()
    }

    /// Series labels in first-seen order.
    pub fn labels(&self) -> Vec<String> {
        self.series.iter().map(|s| s.label.clone()).collect()
    }

    /// Keep only the series in `visible`. The date axis is untouched, so
    /// hiding a series never shifts the x-axis.
    pub fn only(&self, visible: &BTreeSet<String>) -> Reshaped {
        Reshaped {
            dates: self.dates.clone(),
            series: self
                .series
                .iter()
                .filter(|s| visible.contains(&s.label))
                .cloned()
                .collect(),
        }
    }
}

/// Group `records` by key and densify each group over the union of all dates.
///
/// Groups keep first-seen order. When a group has several records on the
/// same date, the last one wins.
pub fn reshape<R: SeriesRecord>(records: &[R]) -> Reshaped {
    let mut dates = BTreeSet::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, HashMap<DateTime<Utc>, f64>)> = Vec::new();

    for record in records {
        let date = record.date();
        let key = record.group_key();
        dates.insert(date);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, HashMap::new()));
                groups.len() - 1
            }
        };
        groups[slot].1.insert(date, record.value());
    }

    let dates: Vec<DateTime<Utc>> = dates.into_iter().collect();
    let series = groups
        .into_iter()
        .map(|(label, values)| ChartSeries {
            label,
            points: dates
                .iter()
                .map(|date| SeriesPoint {
                    date: *date,
                    value: values.get(date).copied(),
                })
                .collect(),
        })
        .collect();

    Reshaped { dates, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use co2_utils::dates::parse_timestamp;

    fn rec(date: &str, key: &str, value: f64) -> TimeSeriesRecord {
        TimeSeriesRecord::new(parse_timestamp(date).unwrap(), key, value)
    }

    fn values(series: &ChartSeries) -> Vec<Option<f64>> {
        series.points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn test_two_groups_on_disjoint_dates() {
        let reshaped = reshape(&[rec("2024-07-01", "A", 10.0), rec("2024-07-02", "B", 20.0)]);
        assert_eq!(
            reshaped.dates,
            vec![
                parse_timestamp("2024-07-01").unwrap(),
                parse_timestamp("2024-07-02").unwrap()
            ]
        );
        assert_eq!(reshaped.labels(), vec!["A", "B"]);
        assert_eq!(values(&reshaped.series[0]), vec![Some(10.0), None]);
        assert_eq!(values(&reshaped.series[1]), vec![None, Some(20.0)]);
    }

    #[test]
    fn test_empty_input() {
        let reshaped = reshape::<TimeSeriesRecord>(&[]);
        assert!(reshaped.dates.is_empty());
        assert!(reshaped.series.is_empty());
        assert!(reshaped.is_empty());
    }

    #[test]
    fn test_duplicate_key_and_date_last_wins() {
        let reshaped = reshape(&[rec("2024-07-01", "A", 5.0), rec("2024-07-01", "A", 9.0)]);
        assert_eq!(reshaped.dates.len(), 1);
        assert_eq!(values(&reshaped.series[0]), vec![Some(9.0)]);
    }

    #[test]
    fn test_zero_is_not_missing() {
        let reshaped = reshape(&[rec("2024-07-01", "A", 0.0), rec("2024-07-02", "B", 1.0)]);
        assert_eq!(values(&reshaped.series[0]), vec![Some(0.0), None]);
    }

    #[test]
    fn test_dates_sorted_and_deduplicated_across_groups() {
        let records = vec![
            rec("2024-07-03", "B", 1.0),
            rec("2024-07-01", "A", 2.0),
            rec("2024-07-03", "A", 3.0),
            rec("2024-07-02", "C", 4.0),
            rec("2024-07-01", "C", 5.0),
        ];
        let reshaped = reshape(&records);

        let mut expected: Vec<DateTime<Utc>> = records.iter().map(|r| r.date).collect();
        expected.sort();
        expected.dedup();
        assert_eq!(reshaped.dates, expected);

        // First-seen group order, not alphabetical
        assert_eq!(reshaped.labels(), vec!["B", "A", "C"]);

        for series in &reshaped.series {
            assert_eq!(series.points.len(), reshaped.dates.len());
            for (point, date) in series.points.iter().zip(&reshaped.dates) {
                assert_eq!(point.date, *date);
                let present = records
                    .iter()
                    .any(|r| r.group_key == series.label && r.date == *date);
                assert_eq!(point.value.is_some(), present);
            }
        }
    }

    #[test]
    fn test_only_keeps_axis() {
        let reshaped = reshape(&[rec("2024-07-01", "A", 1.0), rec("2024-07-05", "B", 2.0)]);
        let visible: BTreeSet<String> = ["A".to_string()].into_iter().collect();
        let shown = reshaped.only(&visible);
        assert_eq!(shown.dates, reshaped.dates);
        assert_eq!(shown.labels(), vec!["A"]);
        assert!(reshaped.only(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_serializes_missing_as_null() {
        let reshaped = reshape(&[rec("2024-07-01", "A", 1.5), rec("2024-07-02", "B", 2.0)]);
        let json = serde_json::to_value(&reshaped).unwrap();
        assert_eq!(json["series"][0]["points"][1]["value"], serde_json::Value::Null);
        assert_eq!(json["series"][0]["points"][0]["value"], 1.5);
    }
}
