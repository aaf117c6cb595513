//! Integration & deployment: the project's CI/CD pipelines and their
//! emissions history.

use super::{pending, to_series, use_active_project};
use co2_chart_ui::components::{ErrorDisplay, HistoricalChart, LoadingSpinner, TagFilter};
use co2_chart_ui::hooks::{use_retrieval, use_series_chart};
use co2_chart_ui::js_bridge::ChartKind;
use co2_chart_ui::state::AppState;
use co2_core::cicd::Pipeline;
use co2_core::date_range::windows;
use co2_data::session::View;
use co2_utils::format::format_grams;
use dioxus::prelude::*;

const CHART_ID: &str = "cicd-history-chart";

#[component]
pub fn CicdPage(project_id: u64) -> Element {
    let project = use_active_project(project_id);

    let loaded = project.read();
    if let Some(placeholder) = pending(&loaded, "project") {
        return placeholder;
    }
    let Some(detail) = loaded.data() else {
        return rsx! {};
    };

    rsx! {
        h2 { style: "margin: 8px 0 16px 0;", "Integration & Deployment: {detail.project.name}" }
        Pipelines { project_id, tags: detail.project.tag_names() }
    }
}

#[component]
fn Pipelines(project_id: u64, tags: Vec<String>) -> Element {
    let state = use_context::<AppState>();
    let match_all = use_signal(|| false);

    let pipeline_tags = tags.clone();
    let pipelines = use_retrieval("Failed to fetch pipelines", move || {
        let all = match_all();
        let client = state.client();
        let tags = pipeline_tags.clone();
        async move { anyhow::Ok(client?.cicd_pipelines(&tags, all).await?) }
    });

    let history_tags = tags.clone();
    let history = use_retrieval("Failed to fetch CI/CD historical data", move || {
        let client = state.client();
        let tags = history_tags.clone();
        async move {
            let records = client?.cicd_history(&windows::reporting(), &tags).await?;
            anyhow::Ok(to_series(records))
        }
    });
    let range = use_signal(windows::chart);
    let chart = use_series_chart(CHART_ID, ChartKind::Line, "CO2 by Pipeline", history, range);

    let list = pipelines.read();
    let status = history.read();

    rsx! {
        TagFilter { tags, match_all }
        div {
            style: "display: grid; grid-template-columns: minmax(320px, 1fr) 2fr; gap: 24px;",
            div {
                if let Some(message) = list.error() {
                    ErrorDisplay { message: message.to_string() }
                } else if let Some(all) = list.data() {
                    if all.is_empty() {
                        p { style: "color: #888;", "No pipelines match these tags" }
                    }
                    for pipeline in all.iter() {
                        PipelineCard { key: "{pipeline.id}", project_id, pipeline: pipeline.clone() }
                    }
                } else {
                    LoadingSpinner { label: "Loading pipelines...".to_string() }
                }
            }
            HistoricalChart {
                title: "CI/CD Emissions History".to_string(),
                chart,
                range,
                loading: status.is_loading(),
                error: status.error().map(str::to_string),
            }
        }
    }
}

#[component]
fn PipelineCard(project_id: u64, pipeline: Pipeline) -> Element {
    let view = View::Pipeline {
        project_id,
        pipeline_id: pipeline.id,
    };

    rsx! {
        div {
            style: "border: 1px solid #ddd; border-radius: 6px; padding: 12px; margin-bottom: 8px;",
            a {
                href: "#{view.path()}",
                style: "font-weight: bold; font-size: 16px; color: #1565C0; text-decoration: none;",
                "{pipeline.pipeline_name}"
            }
            p {
                style: "margin: 4px 0; font-size: 13px; color: #444;",
                "{pipeline.repo_name} @ {pipeline.branch} · {pipeline.cloud_provider}"
            }
            p { style: "margin: 4px 0;", "Total: {format_grams(pipeline.total_co2)}" }
            if let Some(metrics) = pipeline.key_metrics.clone() {
                ul {
                    style: "margin: 4px 0; padding-left: 18px; font-size: 13px;",
                    li { "This week: {format_grams(metrics.weekly_co2_consumption)}" }
                    li { "Last integration: {format_grams(metrics.integration_consumption_last_run)}" }
                    li { "Last deployment: {format_grams(metrics.deployment_consumption_last_run)}" }
                }
            }
        }
    }
}
