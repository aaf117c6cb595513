//! One module per dashboard screen.

mod cicd;
mod infrastructure_element;
mod operations;
mod pipeline;
mod project;
mod projects;

pub use cicd::CicdPage;
pub use infrastructure_element::InfrastructureElementPage;
pub use operations::OperationsPage;
pub use pipeline::PipelinePage;
pub use project::ProjectPage;
pub use projects::ProjectsPage;

use co2_chart_ui::components::{ErrorDisplay, LoadingSpinner};
use co2_chart_ui::hooks::use_retrieval;
use co2_chart_ui::state::AppState;
use co2_core::project::ProjectDetail;
use co2_data::reshape::{SeriesRecord, TimeSeriesRecord};
use co2_data::retrieval::Retrieval;
use dioxus::prelude::*;

/// Reduce typed history records to the shared chart projection.
pub fn to_series<R: SeriesRecord>(records: Vec<R>) -> Vec<TimeSeriesRecord> {
    records.iter().map(TimeSeriesRecord::from_record).collect()
}

/// The project with `id`, from the session when it is already active,
/// otherwise fetched and made active.
pub fn use_active_project(id: u64) -> Signal<Retrieval<ProjectDetail>> {
    let mut state = use_context::<AppState>();

    let project = use_retrieval("Failed to fetch project", move || {
        let cached = state.session.peek().cached_project(id).cloned();
        let client = state.client();
        async move {
            match cached {
                Some(detail) => {
                    log::debug!("Project {} served from session", id);
                    anyhow::Ok(detail)
                }
                None => anyhow::Ok(client?.get_project(id).await?),
            }
        }
    });

    use_effect(move || {
        if let Some(detail) = project.read().data() {
            if state.session.peek().cached_project(id) != Some(detail) {
                state.session.write().set_active_project(Some(detail.clone()));
            }
        }
    });

    project
}

/// Loading and error states shared by pages that wait on one retrieval.
/// Returns `None` once there is data to show.
pub fn pending<T>(retrieval: &Retrieval<T>, what: &str) -> Option<Element> {
    if let Some(message) = retrieval.error() {
        return Some(rsx! { ErrorDisplay { message: message.to_string() } });
    }
    if retrieval.data().is_none() {
        return Some(rsx! { LoadingSpinner { label: format!("Loading {}...", what) } });
    }
    None
}
