use crate::serde_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Headline numbers shown on pipeline cards.
///
/// Unlike the rest of the pipeline payload these fields are snake_case on
/// the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineKeyMetrics {
    pub weekly_co2_consumption: f64,
    pub integration_consumption_last_run: f64,
    pub deployment_consumption_last_run: f64,
}

/// The two halves of a CI/CD run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelinePhase {
    Integration,
    Deployment,
}

impl PipelinePhase {
    pub fn title(&self) -> &'static str {
        match self {
            PipelinePhase::Integration => "Integration",
            PipelinePhase::Deployment => "Deployment",
        }
    }
}

/// One measured step of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMeasurement {
    /// `integration` or `deployment`
    pub step_name: String,
    #[serde(default)]
    pub integration_sub_step_name: Option<String>,
    #[serde(default)]
    pub deployment_stage: Option<String>,
    /// Milliseconds
    pub duration: u64,
    /// Grams CO2e
    pub co2_consumption: f64,
}

impl StepMeasurement {
    pub fn phase(&self) -> Option<PipelinePhase> {
        match self.step_name.as_str() {
            "integration" => Some(PipelinePhase::Integration),
            "deployment" => Some(PipelinePhase::Deployment),
            _ => None,
        }
    }

    /// Sub-step name for integration steps, stage for deployment steps.
    pub fn label(&self) -> &str {
        let label = match self.phase() {
            Some(PipelinePhase::Integration) => self.integration_sub_step_name.as_deref(),
            Some(PipelinePhase::Deployment) => self.deployment_stage.as_deref(),
            None => None,
        };
        label.unwrap_or(&self.step_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    pub id: u64,
    #[serde(with = "serde_time::timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub cicd_pipeline_step_measurements: Vec<StepMeasurement>,
}

impl PipelineRun {
    /// Measurements belonging to one phase, in server order.
    pub fn steps(&self, phase: PipelinePhase) -> impl Iterator<Item = &StepMeasurement> {
        self.cicd_pipeline_step_measurements
            .iter()
            .filter(move |step| step.phase() == Some(phase))
    }
}

/// A CI/CD pipeline. The list endpoint omits `cicdPipelineRuns`; the detail
/// endpoint nests runs and their step measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: u64,
    pub repo_name: String,
    pub branch: String,
    pub cloud_provider: String,
    pub pipeline_name: String,
    pub total_co2: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub key_metrics: Option<PipelineKeyMetrics>,
    #[serde(default)]
    pub cicd_pipeline_runs: Vec<PipelineRun>,
}

impl Pipeline {
    /// The run with `id`, or the first run when `id` is `None` or unknown.
    pub fn run_or_first(&self, id: Option<u64>) -> Option<&PipelineRun> {
        id.and_then(|id| self.cicd_pipeline_runs.iter().find(|run| run.id == id))
            .or_else(|| self.cicd_pipeline_runs.first())
    }
}
