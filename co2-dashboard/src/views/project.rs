//! Single project: SDLC breakdown, user flows and SDLC emissions history.

use super::{pending, to_series};
use co2_chart_ui::components::{ChartHeader, ErrorDisplay, HistoricalChart, LoadingSpinner};
use co2_chart_ui::hooks::{use_retrieval, use_series_chart};
use co2_chart_ui::js_bridge::ChartKind;
use co2_chart_ui::state::AppState;
use co2_core::date_range::windows;
use co2_core::project::SdlcOverview;
use co2_core::user_flow::UserFlow;
use co2_data::session::View;
use co2_utils::format::{format_grams, format_kilograms};
use dioxus::prelude::*;

const CHART_ID: &str = "sdlc-history-chart";

#[component]
pub fn ProjectPage(id: u64) -> Element {
    let mut state = use_context::<AppState>();

    // Detail and user flows succeed or fail together
    let data = use_retrieval("Failed to fetch project data", move || {
        let cached = state.session.peek().cached_project(id).cloned();
        let client = state.client();
        async move {
            let client = client?;
            let (detail, flows) = match cached {
                Some(detail) => (detail, client.user_flows(id).await?),
                None => futures::try_join!(client.get_project(id), client.user_flows(id))?,
            };
            anyhow::Ok((detail, flows))
        }
    });

    use_effect(move || {
        if let Some((detail, _)) = data.read().data() {
            if state.session.peek().cached_project(id) != Some(detail) {
                state.session.write().set_active_project(Some(detail.clone()));
            }
        }
    });

    let loaded = data.read();
    if let Some(placeholder) = pending(&loaded, "project") {
        return placeholder;
    }
    let Some((detail, flows)) = loaded.data().cloned() else {
        return rsx! {};
    };
    let project = &detail.project;

    rsx! {
        h2 { style: "margin: 8px 0 16px 0;", "{project.name}" }
        if !project.description.is_empty() {
            p { style: "color: #444;", "{project.description}" }
        }
        div {
            style: "display: grid; grid-template-columns: 1fr 1fr; gap: 24px;",
            div {
                match detail.sdlc_overview.clone() {
                    Some(overview) => rsx! { SdlcSteps { project_id: id, overview } },
                    None => rsx! { FetchedSdlcSteps { project_id: id } },
                }
                if !flows.is_empty() {
                    UserFlows { flows }
                }
            }
            SdlcHistory { tags: project.tag_names() }
        }
    }
}

/// Overview served by `/projects/{id}/sdlc` when the detail lacks one.
#[component]
fn FetchedSdlcSteps(project_id: u64) -> Element {
    let state = use_context::<AppState>();
    let overview = use_retrieval("Failed to fetch SDLC overview", move || {
        let client = state.client();
        async move {
            anyhow::Ok(client?.sdlc_overview(project_id).await?)
        }
    });

    let loaded = overview.read();
    if let Some(message) = loaded.error() {
        return rsx! { ErrorDisplay { message: message.to_string() } };
    }
    match loaded.data().cloned() {
        Some(overview) => rsx! { SdlcSteps { project_id, overview } },
        None => rsx! { LoadingSpinner { label: "Loading SDLC overview...".to_string() } },
    }
}

#[component]
fn SdlcSteps(project_id: u64, overview: SdlcOverview) -> Element {
    rsx! {
        section {
            style: "border: 1px solid #ddd; border-radius: 6px; padding: 12px;",
            ChartHeader { title: "Software Development Lifecycle".to_string() }
            if let Some(message) = overview.message.clone() {
                p { style: "color: #888;", "{message}" }
            }
            div {
                style: "display: grid; grid-template-columns: repeat(3, 1fr); gap: 8px;",
                for step in overview.steps.iter() {
                    div {
                        key: "{step.name}",
                        style: "border: 1px solid #e0e0e0; border-radius: 4px; padding: 8px;",
                        match View::for_sdlc_step(project_id, step) {
                            Some(view) => rsx! {
                                a {
                                    href: "#{view.path()}",
                                    style: "font-weight: bold; color: #1565C0; text-decoration: none;",
                                    "{step.name}"
                                }
                            },
                            None => rsx! { span { style: "font-weight: bold;", "{step.name}" } },
                        }
                        p {
                            style: "margin: 4px 0 0 0; font-size: 13px;",
                            if step.has_measurements() {
                                "{format_grams(step.total_co2)} this week"
                            } else {
                                "No measurements"
                            }
                        }
                        if let Some(percentage) = step.percentage {
                            p { style: "margin: 0; font-size: 12px; color: #888;", "{percentage:.1}%" }
                        }
                    }
                }
            }
            div {
                style: "margin-top: 8px; padding: 8px; border: 1px solid #e0e0e0; border-radius: 4px;",
                div { style: "font-size: 13px;", "CO2 consumed this week" }
                div { style: "font-size: 18px; font-weight: bold;", "{format_kilograms(overview.total_co2)}" }
            }
        }
    }
}

#[component]
fn UserFlows(flows: Vec<UserFlow>) -> Element {
    rsx! {
        section {
            style: "margin-top: 16px; border: 1px solid #ddd; border-radius: 6px; padding: 12px;",
            ChartHeader { title: "User Flows".to_string() }
            table {
                style: "width: 100%; border-collapse: collapse; font-size: 14px;",
                thead {
                    tr {
                        th { style: "text-align: left;", "Flow" }
                        th { style: "text-align: right;", "CO2" }
                    }
                }
                tbody {
                    for flow in flows.iter() {
                        tr {
                            key: "{flow.id}",
                            td { "{flow.name}" }
                            td { style: "text-align: right;", "{format_grams(flow.co2_consumption)}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SdlcHistory(tags: Vec<String>) -> Element {
    let state = use_context::<AppState>();
    let history = use_retrieval("Failed to fetch project historical data", move || {
        let client = state.client();
        let tags = tags.clone();
        async move {
            let records = client?.sdlc_history(&windows::project(), &tags).await?;
            anyhow::Ok(to_series(records))
        }
    });
    let range = use_signal(windows::chart);
    let chart = use_series_chart(CHART_ID, ChartKind::Line, "CO2 by SDLC Step", history, range);
    let status = history.read();

    rsx! {
        HistoricalChart {
            title: "SDLC Emissions History".to_string(),
            chart,
            range,
            loading: status.is_loading(),
            error: status.error().map(str::to_string),
        }
    }
}
