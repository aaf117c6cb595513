//! Operations: infrastructure elements carrying the project's tags and their
//! emissions history.

use super::{pending, to_series, use_active_project};
use co2_chart_ui::components::{ErrorDisplay, HistoricalChart, LoadingSpinner, TagFilter};
use co2_chart_ui::hooks::{use_retrieval, use_series_chart};
use co2_chart_ui::js_bridge::ChartKind;
use co2_chart_ui::state::AppState;
use co2_core::date_range::windows;
use co2_core::operations::{ElementKeyMetrics, InfrastructureElement};
use co2_data::session::View;
use co2_utils::format::format_grams;
use dioxus::prelude::*;

const CHART_ID: &str = "operations-history-chart";

#[component]
pub fn OperationsPage(project_id: u64) -> Element {
    let project = use_active_project(project_id);

    let loaded = project.read();
    if let Some(placeholder) = pending(&loaded, "project") {
        return placeholder;
    }
    let Some(detail) = loaded.data() else {
        return rsx! {};
    };

    rsx! {
        h2 { style: "margin: 8px 0 16px 0;", "Operations: {detail.project.name}" }
        Operations { project_id, tags: detail.project.tag_names() }
    }
}

#[component]
fn Operations(project_id: u64, tags: Vec<String>) -> Element {
    let state = use_context::<AppState>();
    let match_all = use_signal(|| false);

    let element_tags = tags.clone();
    let elements = use_retrieval("Failed to fetch infrastructure elements", move || {
        let all = match_all();
        let client = state.client();
        let tags = element_tags.clone();
        async move { anyhow::Ok(client?.infrastructure_elements(&tags, all).await?) }
    });

    let history_tags = tags.clone();
    let history = use_retrieval("Failed to fetch operations historical data", move || {
        let client = state.client();
        let tags = history_tags.clone();
        async move {
            let records = client?.operations_history(&windows::project(), &tags).await?;
            anyhow::Ok(to_series(records))
        }
    });
    let range = use_signal(windows::chart);
    let chart = use_series_chart(
        CHART_ID,
        ChartKind::Line,
        "CO2 by Infrastructure Element",
        history,
        range,
    );

    let list = elements.read();
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
                        p { style: "color: #888;", "No infrastructure elements match these tags" }
                    }
                    for element in all.iter() {
                        ElementCard { key: "{element.id}", project_id, element: element.clone() }
                    }
                } else {
                    LoadingSpinner { label: "Loading infrastructure elements...".to_string() }
                }
            }
            HistoricalChart {
                title: "Operations Emissions History".to_string(),
                chart,
                range,
                loading: status.is_loading(),
                error: status.error().map(str::to_string),
            }
        }
    }
}

#[component]
fn ElementCard(project_id: u64, element: InfrastructureElement) -> Element {
    let view = View::InfrastructureElement {
        project_id,
        element_id: element.id,
    };

    rsx! {
        div {
            style: "border: 1px solid #ddd; border-radius: 6px; padding: 12px; margin-bottom: 8px;",
            a {
                href: "#{view.path()}",
                style: "font-weight: bold; font-size: 16px; color: #1565C0; text-decoration: none;",
                "{element.name}"
            }
            p {
                style: "margin: 4px 0; font-size: 13px; color: #444;",
                "{element.kind} · {element.cloud_provider}"
            }
            p { style: "margin: 4px 0;", "Total: {format_grams(element.total_co2)}" }
            if let Some(metrics) = element.key_metrics.clone() {
                KeyMetrics { metrics }
            }
        }
    }
}

#[component]
pub fn KeyMetrics(metrics: ElementKeyMetrics) -> Element {
    let extra: Vec<String> = [&metrics.key_metric1, &metrics.key_metric2]
        .into_iter()
        .flatten()
        .map(ToString::to_string)
        .collect();

    rsx! {
        ul {
            style: "margin: 4px 0; padding-left: 18px; font-size: 13px;",
            li { "Last 24h: {format_grams(metrics.daily_co2_consumption)}" }
            for line in extra {
                li { "{line}" }
            }
        }
    }
}
