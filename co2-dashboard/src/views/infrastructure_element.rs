//! One infrastructure element: key metrics, everything else it reports, and
//! its emissions over the last 30 days.

use super::operations::KeyMetrics;
use super::{pending, to_series, use_active_project};
use co2_chart_ui::components::{ChartHeader, HistoricalChart};
use co2_chart_ui::hooks::{use_retrieval, use_series_chart};
use co2_chart_ui::js_bridge::ChartKind;
use co2_chart_ui::state::AppState;
use co2_core::date_range::windows;
use co2_core::operations::Metric;
use co2_utils::dates::format_timestamp;
use co2_utils::format::format_grams;
use chrono::Utc;
use dioxus::prelude::*;

const CHART_ID: &str = "infrastructure-element-chart";

#[component]
pub fn InfrastructureElementPage(project_id: u64, element_id: u64) -> Element {
    let project = use_active_project(project_id);

    let loaded = project.read();
    if let Some(placeholder) = pending(&loaded, "project") {
        return placeholder;
    }
    let Some(detail) = loaded.data() else {
        return rsx! {};
    };

    rsx! {
        ElementDetail { element_id, tags: detail.project.tag_names() }
    }
}

#[component]
fn ElementDetail(element_id: u64, tags: Vec<String>) -> Element {
    let mut state = use_context::<AppState>();

    let element = use_retrieval("Failed to fetch infrastructure element", move || {
        let client = state.client();
        async move { anyhow::Ok(client?.infrastructure_element(element_id).await?) }
    });

    use_effect(move || {
        if let Some(detail) = element.read().data() {
            state.session.write().set_element_name(detail.element.name.clone());
        }
    });

    let history = use_retrieval("Failed to fetch service historical data", move || {
        let client = state.client();
        let tags = tags.clone();
        async move {
            let window = windows::infrastructure_element(Utc::now());
            let records = client?.service_history(element_id, &window, &tags).await?;
            anyhow::Ok(to_series(records))
        }
    });
    let range = use_signal(|| windows::infrastructure_element(Utc::now()));
    let chart = use_series_chart(CHART_ID, ChartKind::Bar, "Daily CO2", history, range);

    let loaded = element.read();
    if let Some(placeholder) = pending(&loaded, "infrastructure element") {
        return placeholder;
    }
    let Some(detail) = loaded.data().cloned() else {
        return rsx! {};
    };
    let el = detail.element;
    let status = history.read();

    rsx! {
        h2 { style: "margin: 8px 0 4px 0;", "{el.name}" }
        p {
            style: "margin: 0 0 16px 0; color: #444;",
            "{el.kind} · {el.category} · {el.cloud_provider}"
        }
        div {
            style: "display: grid; grid-template-columns: minmax(320px, 1fr) 2fr; gap: 24px;",
            div {
                section {
                    style: "border: 1px solid #ddd; border-radius: 6px; padding: 12px;",
                    ChartHeader { title: "Key Metrics".to_string() }
                    p { style: "margin: 4px 0;", "Total: {format_grams(el.total_co2)}" }
                    if let Some(metrics) = el.key_metrics.clone() {
                        KeyMetrics { metrics }
                    }
                }
                if !detail.metrics.is_empty() {
                    MetricList { metrics: detail.metrics.clone() }
                }
            }
            HistoricalChart {
                title: "Service Emissions, Last 30 Days".to_string(),
                chart,
                range,
                loading: status.is_loading(),
                error: status.error().map(str::to_string),
                toggles: false,
            }
        }
    }
}

#[component]
fn MetricList(metrics: Vec<Metric>) -> Element {
    rsx! {
        section {
            style: "margin-top: 16px; border: 1px solid #ddd; border-radius: 6px; padding: 12px;",
            ChartHeader { title: "Other Metrics".to_string() }
            table {
                style: "width: 100%; border-collapse: collapse; font-size: 14px;",
                tbody {
                    for metric in metrics.iter() {
                        tr {
                            key: "{metric.name}",
                            td { "{metric.name}" }
                            td { style: "text-align: right;", "{metric.display_value()}" }
                            td {
                                style: "text-align: right; color: #888; font-size: 12px;",
                                "{format_timestamp(&metric.timestamp)}"
                            }
                        }
                    }
                }
            }
        }
    }
}
