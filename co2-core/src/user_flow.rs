use serde::{Deserialize, Serialize};

/// A user-facing journey through a project, with its measured emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFlow {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    /// Grams CO2e
    pub co2_consumption: f64,
}
