//! One CI/CD pipeline: per-run step breakdown and weekly emissions.

use super::{pending, to_series, use_active_project};
use co2_chart_ui::components::{ChartHeader, HistoricalChart};
use co2_chart_ui::hooks::{use_retrieval, use_series_chart};
use co2_chart_ui::js_bridge::ChartKind;
use co2_chart_ui::state::AppState;
use co2_core::cicd::{Pipeline, PipelinePhase, PipelineRun};
use co2_core::date_range::windows;
use co2_data::summary::{average_consumption, phase_consumption, SciEstimate};
use co2_utils::dates::axis_label;
use co2_utils::format::{format_duration_ms, format_grams};
use dioxus::prelude::*;

const CHART_ID: &str = "pipeline-history-chart";

fn run_label(run: &PipelineRun) -> String {
    format!(
        "#{} · {} {}",
        run.id,
        axis_label(&run.start_time),
        run.start_time.format("%H:%M")
    )
}

#[component]
pub fn PipelinePage(project_id: u64, pipeline_id: u64) -> Element {
    let project = use_active_project(project_id);

    let loaded = project.read();
    if let Some(placeholder) = pending(&loaded, "project") {
        return placeholder;
    }
    let Some(detail) = loaded.data() else {
        return rsx! {};
    };

    rsx! {
        PipelineDetail { pipeline_id, tags: detail.project.tag_names() }
    }
}

#[component]
fn PipelineDetail(pipeline_id: u64, tags: Vec<String>) -> Element {
    let mut state = use_context::<AppState>();
    let mut selected_run = use_signal(|| None::<u64>);

    let pipeline = use_retrieval("Failed to fetch pipeline", move || {
        let client = state.client();
        async move { anyhow::Ok(client?.cicd_pipeline(pipeline_id).await?) }
    });

    use_effect(move || {
        if let Some(detail) = pipeline.read().data() {
            state.session.write().set_pipeline_name(detail.pipeline_name.clone());
        }
    });

    let history = use_retrieval("Failed to fetch pipeline historical data", move || {
        let client = state.client();
        let tags = tags.clone();
        async move {
            let records = client?
                .pipeline_history(pipeline_id, &windows::pipeline(), &tags)
                .await?;
            anyhow::Ok(to_series(records))
        }
    });
    let range = use_signal(windows::pipeline);
    let chart = use_series_chart(CHART_ID, ChartKind::Bar, "CO2 per Day", history, range);

    let loaded = pipeline.read();
    if let Some(placeholder) = pending(&loaded, "pipeline") {
        return placeholder;
    }
    let Some(detail) = loaded.data().cloned() else {
        return rsx! {};
    };
    let run = detail.run_or_first(selected_run()).cloned();
    let shown_id = run.as_ref().map(|r| r.id);

    let status = history.read();
    let records = status.data().map(Vec::as_slice).unwrap_or_default();
    let average = average_consumption(records)
        .map(format_grams)
        .unwrap_or_else(|| "n/a".to_string());
    let sci = SciEstimate::for_records(records);

    rsx! {
        PipelineHeading { pipeline: detail.clone() }

        if detail.cicd_pipeline_runs.is_empty() {
            p { style: "color: #888;", "No runs recorded" }
        } else {
            label {
                "Run: "
                select {
                    onchange: move |evt: Event<FormData>| {
                        selected_run.set(evt.value().parse().ok());
                    },
                    for r in detail.cicd_pipeline_runs.iter() {
                        option {
                            key: "{r.id}",
                            value: "{r.id}",
                            selected: shown_id == Some(r.id),
                            "{run_label(r)}"
                        }
                    }
                }
            }
        }

        if let Some(run) = run {
            div {
                style: "display: grid; grid-template-columns: 1fr 1fr; gap: 24px; margin-top: 12px;",
                PhaseTable { run: run.clone(), phase: PipelinePhase::Integration }
                PhaseTable { run, phase: PipelinePhase::Deployment }
            }
        }

        div {
            style: "display: flex; gap: 24px; margin-top: 16px;",
            div {
                div { style: "font-size: 13px;", "Average Pipeline Consumption 1 week" }
                div { style: "font-size: 18px; font-weight: bold;", "{average}" }
            }
            div {
                div { style: "font-size: 13px;", "SCI per week" }
                div { style: "font-size: 18px; font-weight: bold;", "{sci}" }
            }
        }

        HistoricalChart {
            title: "Pipeline Emissions History".to_string(),
            chart,
            range,
            loading: status.is_loading(),
            error: status.error().map(str::to_string),
            toggles: false,
        }
    }
}

#[component]
fn PipelineHeading(pipeline: Pipeline) -> Element {
    rsx! {
        h2 { style: "margin: 8px 0 4px 0;", "{pipeline.pipeline_name}" }
        p {
            style: "margin: 0 0 12px 0; color: #444;",
            "{pipeline.repo_name} @ {pipeline.branch} · {pipeline.cloud_provider} · total {format_grams(pipeline.total_co2)}"
        }
    }
}

#[component]
fn PhaseTable(run: PipelineRun, phase: PipelinePhase) -> Element {
    let total = phase_consumption(&run, phase);

    rsx! {
        section {
            style: "border: 1px solid #ddd; border-radius: 6px; padding: 12px;",
            ChartHeader { title: phase.title().to_string(), subtitle: format_grams(total) }
            table {
                style: "width: 100%; border-collapse: collapse; font-size: 14px;",
                thead {
                    tr {
                        th { style: "text-align: left;", "Step" }
                        th { style: "text-align: right;", "Duration" }
                        th { style: "text-align: right;", "CO2" }
                    }
                }
                tbody {
                    for step in run.steps(phase) {
                        tr {
                            td { "{step.label()}" }
                            td { style: "text-align: right;", "{format_duration_ms(step.duration)}" }
                            td { style: "text-align: right;", "{format_grams(step.co2_consumption)}" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_label() {
        let run: PipelineRun = serde_json::from_str(
            r#"{"id": 41, "startTime": "2024-07-22T08:30:00Z", "cicdPipelineStepMeasurements": []}"#,
        )
        .unwrap();
        assert_eq!(run_label(&run), "#41 · Jul 22 08:30");
    }
}
