//! Turning historical CO2 records into chart data, plus the small pieces of
//! view state the dashboard keeps around them.
//!
//! The flow for every chart is fetch, [`filter::filter`], then
//! [`reshape::reshape`]; [`selection`] decides which of the resulting
//! series are drawn.

pub mod reshape;
pub mod retrieval;
pub mod session;

/// Client-side date-window filtering.
pub mod filter {
    use crate::reshape::SeriesRecord;
    use co2_core::date_range::DateRange;

    /// Records strictly inside `range`, in their original order.
    ///
    /// Records dated exactly on `range.start` or `range.end` are dropped; an
    /// inverted or zero-length range keeps nothing.
    pub fn filter<R: SeriesRecord + Clone>(records: &[R], range: &DateRange) -> Vec<R> {
        if range.is_empty() {
            return Vec::new();
        }
        records
            .iter()
            .filter(|r| range.contains(&r.date()))
            .cloned()
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::reshape::TimeSeriesRecord;
        use co2_utils::dates::parse_timestamp;

        fn rec(date: &str, key: &str) -> TimeSeriesRecord {
            TimeSeriesRecord::new(parse_timestamp(date).unwrap(), key, 1.0)
        }

        fn range(start: &str, end: &str) -> DateRange {
            DateRange::new(parse_timestamp(start).unwrap(), parse_timestamp(end).unwrap())
        }

        #[test]
        fn test_filter_excludes_bounds() {
            let records = vec![
                rec("2024-07-01", "start"),
                rec("2024-07-02", "inside"),
                rec("2024-07-05", "end"),
                rec("2024-06-01", "before"),
            ];
            let kept = filter(&records, &range("2024-07-01", "2024-07-05"));
            assert_eq!(kept, vec![rec("2024-07-02", "inside")]);
        }

        #[test]
        fn test_filter_preserves_order() {
            let records = vec![
                rec("2024-07-04", "a"),
                rec("2024-07-02", "b"),
                rec("2024-07-03", "c"),
            ];
            let kept = filter(&records, &range("2024-07-01", "2024-07-10"));
            assert_eq!(kept, records);
        }

        #[test]
        fn test_filter_is_idempotent() {
            let records = vec![
                rec("2024-07-01", "a"),
                rec("2024-07-02T12:00:00Z", "b"),
                rec("2024-07-03", "c"),
                rec("2024-07-09", "d"),
            ];
            let window = range("2024-07-01", "2024-07-09");
            let once = filter(&records, &window);
            assert_eq!(filter(&once, &window), once);
        }

        #[test]
        fn test_filter_empty_and_inverted() {
            let empty: Vec<TimeSeriesRecord> = Vec::new();
            assert!(filter(&empty, &range("2024-07-01", "2024-07-05")).is_empty());
            assert!(filter(&empty, &range("2024-07-05", "2024-07-01")).is_empty());

            let records = vec![rec("2024-07-03", "a")];
            assert!(filter(&records, &range("2024-07-05", "2024-07-01")).is_empty());
        }
    }
}

/// Which series a chart draws.
pub mod selection {
    use std::collections::BTreeSet;

    /// `selection` with `label` flipped: added when absent, removed when present.
    pub fn toggle(selection: &BTreeSet<String>, label: &str) -> BTreeSet<String> {
        let mut next = selection.clone();
        if !next.remove(label) {
            next.insert(label.to_string());
        }
        next
    }

    /// Visible series labels for one chart.
    ///
    /// Seeded with every label from the first grouping that has any, then
    /// left to the user. Later groupings never reset it, even when the user
    /// has hidden everything.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ActiveSelection {
        visible: BTreeSet<String>,
        seeded: bool,
    }

    impl ActiveSelection {
        pub fn new() -> Self {
            Self::default()
        }

        /// Offer the labels of a fresh grouping. Returns `true` if this call
        /// seeded the selection.
        pub fn seed<I: IntoIterator<Item = String>>(&mut self, labels: I) -> bool {
            if self.seeded {
                return false;
            }
            let labels: BTreeSet<String> = labels.into_iter().collect();
            if labels.is_empty() {
                return false;
            }
            self.visible = labels;
            self.seeded = true;
            true
        }

        pub fn toggle(&mut self, label: &str) {
            self.visible = toggle(&self.visible, label);
        }

        pub fn is_visible(&self, label: &str) -> bool {
            self.visible.contains(label)
        }

        pub fn visible(&self) -> &BTreeSet<String> {
            &self.visible
        }

        pub fn is_seeded(&self) -> bool {
            self.seeded
        }
    }

}

/// Pipeline view figures derived on the client.
pub mod summary {
    use crate::reshape::SeriesRecord;
    use co2_core::cicd::{PipelinePhase, PipelineRun};
    use std::fmt;

    /// Mean value over `records`, `None` when there are none.
    pub fn average_consumption<R: SeriesRecord>(records: &[R]) -> Option<f64> {
        if records.is_empty() {
            return None;
        }
        let total: f64 = records.iter().map(|r| r.value()).sum();
        Some(total / records.len() as f64)
    }

    /// Total grams CO2e for one phase of a run.
    pub fn phase_consumption(run: &PipelineRun, phase: PipelinePhase) -> f64 {
        run.steps(phase).map(|s| s.co2_consumption).sum()
    }

    /// Software Carbon Intensity per week.
    ///
    /// The backend does not yet provide the functional unit needed to compute
    /// it, so the only value is a placeholder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SciEstimate {
        Unimplemented,
    }

    impl SciEstimate {
        pub fn for_records<R: SeriesRecord>(_records: &[R]) -> Self {
            SciEstimate::Unimplemented
        }
    }

    impl fmt::Display for SciEstimate {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                SciEstimate::Unimplemented => write!(f, "not yet available"),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::reshape::TimeSeriesRecord;
        use co2_utils::dates::parse_timestamp;

        #[test]
        fn test_average_consumption() {
            let date = parse_timestamp("2024-07-10").unwrap();
            let records = vec![
                TimeSeriesRecord::new(date, "p", 2.0),
                TimeSeriesRecord::new(date, "p", 3.0),
                TimeSeriesRecord::new(date, "p", 7.0),
            ];
            assert_eq!(average_consumption(&records), Some(4.0));
            assert_eq!(average_consumption::<TimeSeriesRecord>(&[]), None);
        }

        #[test]
        fn test_phase_consumption() {
            let run: PipelineRun = serde_json::from_str(
                r#"{"id": 1, "startTime": "2024-07-20T08:00:00Z", "cicdPipelineStepMeasurements": [
                    {"stepName": "integration", "integrationSubStepName": "build", "duration": 1000, "co2Consumption": 1.5},
                    {"stepName": "integration", "integrationSubStepName": "test", "duration": 1000, "co2Consumption": 2.5},
                    {"stepName": "deployment", "deploymentStage": "prod", "duration": 1000, "co2Consumption": 0.5}
                ]}"#,
            )
            .unwrap();
            assert_eq!(phase_consumption(&run, PipelinePhase::Integration), 4.0);
            assert_eq!(phase_consumption(&run, PipelinePhase::Deployment), 0.5);
        }

        #[test]
        fn test_sci_is_placeholder() {
            let sci = SciEstimate::for_records::<TimeSeriesRecord>(&[]);
            assert_eq!(sci, SciEstimate::Unimplemented);
            assert_eq!(sci.to_string(), "not yet available");
        }
    }
}

/// [`SeriesRecord`](reshape::SeriesRecord) for each historical endpoint,
/// which fixes the group key each chart uses.
pub mod adapters {
    use crate::reshape::SeriesRecord;
    use chrono::{DateTime, Utc};
    use co2_core::historical::{
        CicdRecord, CrossProjectRecord, InfrastructureRecord, OperationsRecord, PipelineRecord,
        SdlcRecord,
    };

    impl SeriesRecord for CrossProjectRecord {
        fn date(&self) -> DateTime<Utc> {
            self.date
        }
        fn group_key(&self) -> String {
            self.project_name.clone()
        }
        fn value(&self) -> f64 {
            self.total_co2_consumption
        }
    }

    impl SeriesRecord for SdlcRecord {
        fn date(&self) -> DateTime<Utc> {
            self.date
        }
        fn group_key(&self) -> String {
            self.sdlc_step.clone()
        }
        fn value(&self) -> f64 {
            self.total_co2_consumption
        }
    }

    impl SeriesRecord for OperationsRecord {
        fn date(&self) -> DateTime<Utc> {
            self.date
        }
        /// `orders-db (RDS - AWS)`
        fn group_key(&self) -> String {
            format!(
                "{} ({} - {})",
                self.infrastructure_element_name, self.service_name, self.cloud_provider
            )
        }
        fn value(&self) -> f64 {
            self.total_co2_consumption
        }
    }

    impl SeriesRecord for CicdRecord {
        fn date(&self) -> DateTime<Utc> {
            self.date
        }
        /// `checkout-ci (Azure)`
        fn group_key(&self) -> String {
            format!("{} ({})", self.pipeline_name, self.cloud_provider)
        }
        fn value(&self) -> f64 {
            self.total_co2_consumption
        }
    }

    impl SeriesRecord for InfrastructureRecord {
        fn date(&self) -> DateTime<Utc> {
            self.date
        }
        fn group_key(&self) -> String {
            self.infrastructure_type.clone()
        }
        fn value(&self) -> f64 {
            self.total_co2_consumption
        }
    }

    impl SeriesRecord for PipelineRecord {
        fn date(&self) -> DateTime<Utc> {
            self.date
        }
        fn group_key(&self) -> String {
            self.pipeline_name.clone()
        }
        fn value(&self) -> f64 {
            self.total_co2_consumption
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::filter::filter;
        use crate::reshape::reshape;
        use co2_core::date_range::windows;
        use co2_core::historical::decode_records;

        #[test]
        fn test_operations_group_key() {
            let records: Vec<OperationsRecord> = decode_records(
                r#"[
                    {"date": "2024-07-01", "infrastructure_element_name": "orders-db", "service_name": "RDS", "cloud_provider": "AWS", "total_co2_consumption": 12.5},
                    {"date": "2024-07-02", "infrastructure_element_name": "web", "service_name": "EC2", "cloud_provider": "AWS", "total_co2_consumption": 3.0},
                    {"date": "2024-07-02", "infrastructure_element_name": "orders-db", "service_name": "RDS", "cloud_provider": "AWS", "total_co2_consumption": 11.0}
                ]"#,
            )
            .unwrap();
            let reshaped = reshape(&records);
            assert_eq!(reshaped.labels(), vec!["orders-db (RDS - AWS)", "web (EC2 - AWS)"]);
            assert_eq!(reshaped.series[1].points[0].value, None);
        }

        #[test]
        fn test_cicd_history_through_filter_and_reshape() {
            let records: Vec<CicdRecord> = decode_records(
                r#"[
                    {"date": "2024-07-03", "pipelineName": "checkout-ci", "cloudProvider": "Azure", "total_co2_consumption": 1.0},
                    {"date": "2024-07-10", "pipelineName": "checkout-ci", "cloudProvider": "Azure", "total_co2_consumption": 2.0},
                    {"date": "2024-07-11", "pipelineName": "search-ci", "cloudProvider": "GCP", "total_co2_consumption": 4.0}
                ]"#,
            )
            .unwrap();
            // 07-03 falls before the reporting window
            let reshaped = reshape(&filter(&records, &windows::reporting()));
            assert_eq!(reshaped.dates.len(), 2);
            assert_eq!(reshaped.labels(), vec!["checkout-ci (Azure)", "search-ci (GCP)"]);
        }

        #[test]
        fn test_single_key_views() {
            let sdlc: Vec<SdlcRecord> = decode_records(
                r#"[{"sdlc_step": "operations", "date": "2024-07-05", "total_co2_consumption": 3.5}]"#,
            )
            .unwrap();
            assert_eq!(sdlc[0].group_key(), "operations");

            let cross: Vec<CrossProjectRecord> = decode_records(
                r#"[{"project_id": 3, "project_name": "Checkout", "date": "2024-07-05", "total_co2_consumption": 3.5}]"#,
            )
            .unwrap();
            assert_eq!(cross[0].group_key(), "Checkout");

            let infra: Vec<InfrastructureRecord> = decode_records(
                r#"[{"infrastructure_type": "database", "service_id": "12", "date": "2024-07-05", "total_co2_consumption": 3.5}]"#,
            )
            .unwrap();
            assert_eq!(infra[0].group_key(), "database");

            let pipeline: Vec<PipelineRecord> = decode_records(
                r#"[{"pipeline_name": "checkout-ci", "pipeline_id": "5", "date": "2024-07-05", "total_co2_consumption": 3.5}]"#,
            )
            .unwrap();
            assert_eq!(pipeline[0].value(), 3.5);
        }
    }
}
