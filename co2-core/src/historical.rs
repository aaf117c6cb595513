//! Historical CO2 records, one type per chart, and the query that fetches them.
use crate::date_range::DateRange;
use crate::error::{ApiError, Result};
use crate::serde_time;
use chrono::{DateTime, Utc};
use co2_utils::dates::format_timestamp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `GET /historical-data/cross-project`: one row per project per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossProjectRecord {
    #[serde(default)]
    pub project_id: Option<u64>,
    pub project_name: String,
    #[serde(with = "serde_time::timestamp")]
    pub date: DateTime<Utc>,
    pub total_co2_consumption: f64,
}

/// `GET /historical-data/projects/sdlc`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdlcRecord {
    pub sdlc_step: String,
    #[serde(with = "serde_time::timestamp")]
    pub date: DateTime<Utc>,
    pub total_co2_consumption: f64,
}

/// `GET /historical-data/projects/operations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationsRecord {
    #[serde(with = "serde_time::timestamp")]
    pub date: DateTime<Utc>,
    pub infrastructure_element_name: String,
    pub service_name: String,
    pub cloud_provider: String,
    pub total_co2_consumption: f64,
}

/// `GET /historical-data/projects/cicd`
///
/// The only historical endpoint with camelCase names, except for the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CicdRecord {
    #[serde(with = "serde_time::timestamp")]
    pub date: DateTime<Utc>,
    pub pipeline_name: String,
    pub cloud_provider: String,
    #[serde(rename = "total_co2_consumption")]
    pub total_co2_consumption: f64,
}

/// `GET /historical-data/projects/services/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureRecord {
    pub infrastructure_type: String,
    #[serde(with = "serde_time::timestamp")]
    pub date: DateTime<Utc>,
    pub total_co2_consumption: f64,
}

/// `GET /historical-data/projects/pipelines/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRecord {
    pub pipeline_name: String,
    #[serde(with = "serde_time::timestamp")]
    pub date: DateTime<Utc>,
    pub total_co2_consumption: f64,
}

/// Which historical endpoint to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoricalView {
    CrossProject,
    Sdlc,
    Operations,
    Cicd,
    /// Infrastructure element (service) by id
    Service(u64),
    Pipeline(u64),
}

impl HistoricalView {
    pub fn path(&self) -> String {
        match self {
            HistoricalView::CrossProject => "historical-data/cross-project".to_string(),
            HistoricalView::Sdlc => "historical-data/projects/sdlc".to_string(),
            HistoricalView::Operations => "historical-data/projects/operations".to_string(),
            HistoricalView::Cicd => "historical-data/projects/cicd".to_string(),
            HistoricalView::Service(id) => format!("historical-data/projects/services/{}", id),
            HistoricalView::Pipeline(id) => format!("historical-data/projects/pipelines/{}", id),
        }
    }

    /// The cross-project endpoint is not scoped by project tags.
    pub fn takes_tags(&self) -> bool {
        !matches!(self, HistoricalView::CrossProject)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalQuery {
    pub view: HistoricalView,
    pub range: DateRange,
    pub tags: Vec<String>,
}

impl HistoricalQuery {
    pub fn new(view: HistoricalView, range: DateRange) -> Self {
        Self {
            view,
            range,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// `startDate`, `endDate` and, for project-scoped views, comma-joined `tags`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("startDate", format_timestamp(&self.range.start)),
            ("endDate", format_timestamp(&self.range.end)),
        ];
        if self.view.takes_tags() {
            pairs.push(("tags", self.tags.join(",")));
        }
        pairs
    }
}

/// Decode a JSON array of records, skipping items that do not fit `R`.
///
/// A body that is not an array at all is an error.
pub fn decode_records<R: DeserializeOwned>(body: &str) -> Result<Vec<R>> {
    let items: Vec<serde_json::Value> = match serde_json::from_str(body)? {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(ApiError::InvalidResponse(format!(
                "expected an array of records, got {}",
                json_kind(&other)
            )))
        }
    };

    let total = items.len();
    let records: Vec<R> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed record {} of {}: {}", i, total, e);
                None
            }
        })
        .collect();
    Ok(records)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
