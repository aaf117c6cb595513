use crate::serde_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text label attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

/// A software project as listed by `GET /projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, with = "serde_time::option_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_time::option_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Project {
    /// Tag names, in the order the server returned them.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}

/// One SDLC phase and its share of a project's emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdlcStep {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    /// Grams CO2e; zero means no measurements for the phase.
    pub total_co2: f64,
    #[serde(default)]
    pub percentage: Option<f64>,
}

impl SdlcStep {
    /// URL segment for the step's detail view, e.g. `integration_deployment`
    /// becomes `integration-deployment`.
    pub fn path_segment(&self) -> String {
        self.name.to_lowercase().replace('_', "-")
    }

    pub fn has_measurements(&self) -> bool {
        self.total_co2 > 0.0
    }
}

/// Per-project SDLC breakdown, nested in [`ProjectDetail`] and also served
/// standalone by `GET /projects/{id}/sdlc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdlcOverview {
    #[serde(default)]
    pub project_id: Option<u64>,
    pub total_co2: f64,
    #[serde(default)]
    pub steps: Vec<SdlcStep>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /projects/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub sdlc_overview: Option<SdlcOverview>,
}

/// Request body for creating or updating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFormData {
    pub name: String,
    pub description: String,
    /// Tag names; the server creates unknown tags.
    pub tags: Vec<String>,
}

impl From<&Project> for ProjectFormData {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            tags: project.tag_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT_DETAIL: &str = r#"{
        "id": 3,
        "name": "Checkout",
        "description": "Storefront checkout service",
        "tags": [{"id": 1, "name": "shop"}, {"id": 7, "name": "payments"}],
        "createdAt": "2024-05-02T09:00:00.000Z",
        "lastUpdated": "2024-07-20T17:12:45.120Z",
        "sdlcOverview": {
            "totalCo2": 812.5,
            "steps": [
                {"name": "operations", "totalCo2": 700.0, "percentage": 86.15},
                {"name": "integration_deployment", "totalCo2": 112.5, "percentage": 13.85},
                {"name": "planning", "totalCo2": 0, "percentage": 0}
            ]
        }
    }"#;

    #[test]
    fn test_project_detail_decodes_flattened_fields() {
        let detail: ProjectDetail = serde_json::from_str(PROJECT_DETAIL).unwrap();
        assert_eq!(detail.project.id, 3);
        assert_eq!(detail.project.tag_names(), vec!["shop", "payments"]);
        assert!(detail.project.created_at.is_some());
        let overview = detail.sdlc_overview.unwrap();
        assert_eq!(overview.steps.len(), 3);
        assert_eq!(overview.steps[1].path_segment(), "integration-deployment");
        assert!(!overview.steps[2].has_measurements());
    }

    #[test]
    fn test_project_without_optional_fields() {
        let project: Project = serde_json::from_str(r#"{"id": 9, "name": "Bare"}"#).unwrap();
        assert!(project.tags.is_empty());
        assert!(project.created_at.is_none());
        assert_eq!(project.description, "");
    }

    #[test]
    fn test_form_data_from_project() {
        let detail: ProjectDetail = serde_json::from_str(PROJECT_DETAIL).unwrap();
        let form = ProjectFormData::from(&detail.project);
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["name"], "Checkout");
        assert_eq!(body["tags"][1], "payments");
    }
}
