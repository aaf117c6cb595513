use crate::serde_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a metric value should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricDataType {
    Integer,
    Decimal,
    String,
}

/// A metric value as sent by the server: either a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Render the value according to its declared data type.
    pub fn display(&self, data_type: MetricDataType) -> String {
        match (self, data_type) {
            (MetricValue::Number(n), MetricDataType::Integer) => format!("{:.0}", n),
            (MetricValue::Number(n), MetricDataType::Decimal) => format!("{:.2}", n),
            (MetricValue::Number(n), MetricDataType::String) => n.to_string(),
            (MetricValue::Text(s), _) => s.clone(),
        }
    }
}

/// A headline metric shown on infrastructure element cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetric {
    pub name: String,
    pub value: f64,
    pub data_type: MetricDataType,
    #[serde(with = "serde_time::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for KeyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name,
            MetricValue::Number(self.value).display(self.data_type)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementKeyMetrics {
    /// Grams CO2e over the last day
    pub daily_co2_consumption: f64,
    pub key_metric1: Option<KeyMetric>,
    pub key_metric2: Option<KeyMetric>,
}

/// A cloud resource (VM, database, bucket...) attributed to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureElement {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub category: String,
    pub cloud_provider: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub total_co2: f64,
    #[serde(default)]
    pub key_metrics: Option<ElementKeyMetrics>,
}

/// Any metric reported for an element, shown on its detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    pub data_type: MetricDataType,
    #[serde(with = "serde_time::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Metric {
    pub fn display_value(&self) -> String {
        self.value.display(self.data_type)
    }
}

/// `GET /operations/infrastructure-elements/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureElementDetail {
    #[serde(flatten)]
    pub element: InfrastructureElement,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}
