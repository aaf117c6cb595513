//! Projects overview: searchable project list with create/edit/delete and
//! the cross-project emissions chart.

use super::to_series;
use co2_chart_ui::components::{ErrorDisplay, HistoricalChart, LoadingSpinner};
use co2_chart_ui::hooks::{use_retrieval, use_series_chart};
use co2_chart_ui::js_bridge::ChartKind;
use co2_chart_ui::state::AppState;
use co2_core::date_range::windows;
use co2_core::project::{Project, ProjectFormData};
use co2_data::session::View;
use co2_utils::dates::format_date;
use dioxus::prelude::*;

const CHART_ID: &str = "cross-project-chart";

/// Comma-separated tag input to tag names, dropping blanks and repeats.
fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Case-insensitive name search.
fn matches_search(project: &Project, term: &str) -> bool {
    project
        .name
        .to_lowercase()
        .contains(&term.trim().to_lowercase())
}

#[derive(Clone, PartialEq)]
enum FormMode {
    Create,
    Edit(Project),
}

impl FormMode {
    /// Distinct per project, so switching targets remounts the form.
    fn key(&self) -> String {
        match self {
            FormMode::Create => "new".to_string(),
            FormMode::Edit(project) => format!("edit-{}", project.id),
        }
    }

    fn initial(&self) -> ProjectFormData {
        match self {
            FormMode::Create => ProjectFormData {
                name: String::new(),
                description: String::new(),
                tags: Vec::new(),
            },
            FormMode::Edit(project) => ProjectFormData::from(project),
        }
    }
}

#[component]
pub fn ProjectsPage() -> Element {
    let state = use_context::<AppState>();
    let mut reload = use_signal(|| 0u32);
    let mut search = use_signal(String::new);
    let mut form = use_signal(|| None::<FormMode>);
    let mut action_error = use_signal(|| None::<String>);

    let projects = use_retrieval("Failed to fetch projects", move || {
        let generation = reload();
        let client = state.client();
        async move {
            log::info!("Loading projects (refresh {})", generation);
            anyhow::Ok(client?.list_projects().await?)
        }
    });

    let history = use_retrieval("Failed to fetch historical data", move || {
        let client = state.client();
        async move {
            let records = client?.cross_project_history(&windows::reporting()).await?;
            anyhow::Ok(to_series(records))
        }
    });
    let range = use_signal(windows::chart);
    let chart = use_series_chart(
        CHART_ID,
        ChartKind::Line,
        "CO2 Consumption by Project",
        history,
        range,
    );

    let on_submit = move |data: ProjectFormData| {
        let mode = form.peek().clone();
        let client = state.client();
        spawn(async move {
            let result = async {
                let client = client?;
                match mode {
                    Some(FormMode::Edit(project)) => client.update_project(project.id, &data).await?,
                    _ => client.create_project(&data).await?,
                };
                anyhow::Ok(())
            }
            .await;
            match result {
                Ok(()) => {
                    form.set(None);
                    action_error.set(None);
                    reload += 1;
                }
                Err(e) => {
                    log::error!("Failed to save project: {:#}", e);
                    action_error.set(Some("Failed to save project".to_string()));
                }
            }
        });
    };

    let on_delete = move |id: u64| {
        let client = state.client();
        spawn(async move {
            let result = async { anyhow::Ok(client?.delete_project(id).await?) }.await;
            match result {
                Ok(()) => {
                    action_error.set(None);
                    reload += 1;
                }
                Err(e) => {
                    log::error!("Failed to delete project {}: {:#}", id, e);
                    action_error.set(Some(format!("Failed to delete project: {}", e)));
                }
            }
        });
    };

    let list = projects.read();
    let term = search();
    let shown: Vec<Project> = list
        .data()
        .map(|all| all.iter().filter(|p| matches_search(p, &term)).cloned().collect())
        .unwrap_or_default();
    let history_state = history.read();

    rsx! {
        div {
            style: "display: grid; grid-template-columns: minmax(320px, 1fr) 2fr; gap: 24px;",

            div {
                input {
                    r#type: "search",
                    placeholder: "Search projects",
                    value: "{term}",
                    style: "width: 100%; padding: 8px; margin-bottom: 8px; box-sizing: border-box;",
                    oninput: move |evt: Event<FormData>| search.set(evt.value()),
                }
                button {
                    style: "margin-bottom: 12px;",
                    onclick: move |_| form.set(Some(FormMode::Create)),
                    "Add New Project"
                }

                if let Some(message) = action_error() {
                    ErrorDisplay { message }
                }

                if let Some(mode) = form() {
                    ProjectEditor {
                        mode,
                        on_submit,
                        on_cancel: move |_| form.set(None),
                    }
                }

                if let Some(message) = list.error() {
                    ErrorDisplay { message: message.to_string() }
                } else if list.data().is_none() {
                    LoadingSpinner { label: "Loading projects...".to_string() }
                } else if shown.is_empty() {
                    p { style: "color: #888;", "No projects found" }
                } else {
                    for project in shown {
                        ProjectCard {
                            key: "{project.id}",
                            project: project.clone(),
                            on_edit: move |p: Project| form.set(Some(FormMode::Edit(p))),
                            on_delete,
                        }
                    }
                }
            }

            HistoricalChart {
                title: "Cross-Project CO2 Consumption".to_string(),
                chart,
                range,
                loading: history_state.is_loading(),
                error: history_state.error().map(str::to_string),
            }
        }
    }
}

#[component]
fn ProjectCard(
    project: Project,
    on_edit: EventHandler<Project>,
    on_delete: EventHandler<u64>,
) -> Element {
    let href = format!("#{}", View::Project { id: project.id }.path());
    let updated = project
        .last_updated
        .map(|ts| format_date(&ts.date_naive()))
        .unwrap_or_default();
    let id = project.id;
    let editable = project.clone();

    rsx! {
        div {
            style: "border: 1px solid #ddd; border-radius: 6px; padding: 12px; margin-bottom: 8px;",
            a {
                href: "{href}",
                style: "font-weight: bold; font-size: 16px; color: #1565C0; text-decoration: none;",
                "{project.name}"
            }
            if !project.description.is_empty() {
                p { style: "margin: 4px 0; color: #444;", "{project.description}" }
            }
            div {
                style: "display: flex; flex-wrap: wrap; gap: 4px; margin: 4px 0;",
                for tag in project.tags.iter() {
                    span {
                        key: "{tag.id}",
                        style: "padding: 2px 8px; border-radius: 12px; background: #E3F2FD; font-size: 12px;",
                        "{tag.name}"
                    }
                }
            }
            if !updated.is_empty() {
                p { style: "margin: 4px 0; font-size: 12px; color: #888;", "Last updated {updated}" }
            }
            div {
                style: "display: flex; gap: 8px;",
                button { onclick: move |_| on_edit.call(editable.clone()), "Edit" }
                button { onclick: move |_| on_delete.call(id), "Delete" }
            }
        }
    }
}

/// The form for `mode`. Keyed so its fields start over whenever the target
/// project changes while the form is open.
#[component]
fn ProjectEditor(
    mode: FormMode,
    on_submit: EventHandler<ProjectFormData>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        for mode in [mode] {
            ProjectForm {
                key: "{mode.key()}",
                initial: mode.initial(),
                on_submit,
                on_cancel,
            }
        }
    }
}

#[component]
fn ProjectForm(
    initial: ProjectFormData,
    on_submit: EventHandler<ProjectFormData>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut name = use_signal(|| initial.name.clone());
    let mut description = use_signal(|| initial.description.clone());
    let mut tags = use_signal(|| initial.tags.join(", "));

    let submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        if name.peek().trim().is_empty() {
            return;
        }
        on_submit.call(ProjectFormData {
            name: name.peek().trim().to_string(),
            description: description.peek().clone(),
            tags: parse_tags(&tags.peek()),
        });
    };

    rsx! {
        form {
            style: "display: flex; flex-direction: column; gap: 8px; padding: 12px; margin-bottom: 12px; background: #FAFAFA; border: 1px solid #ddd; border-radius: 6px;",
            onsubmit: submit,
            input {
                placeholder: "Name",
                value: "{name}",
                required: true,
                oninput: move |evt: Event<FormData>| name.set(evt.value()),
            }
            textarea {
                placeholder: "Description",
                value: "{description}",
                oninput: move |evt: Event<FormData>| description.set(evt.value()),
            }
            input {
                placeholder: "Tags (comma separated)",
                value: "{tags}",
                oninput: move |evt: Event<FormData>| tags.set(evt.value()),
            }
            div {
                style: "display: flex; gap: 8px;",
                button { r#type: "submit", "Save" }
                button { r#type: "button", onclick: move |_| on_cancel.call(()), "Cancel" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::dioxus_core::{NoOpMutations, VirtualDom};
    use std::cell::RefCell;

    thread_local! {
        static EDITING: RefCell<FormMode> = RefCell::new(FormMode::Create);
    }

    fn project(id: u64, name: &str) -> Project {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "description": format!("{} service", name),
            "tags": [{"id": id, "name": name.to_lowercase()}]
        }))
        .unwrap()
    }

    #[component]
    fn EditorHost() -> Element {
        let mode = EDITING.with(|m| m.borrow().clone());
        rsx! {
            ProjectEditor {
                mode,
                on_submit: move |_: ProjectFormData| {},
                on_cancel: move |_| {},
            }
        }
    }

    #[test]
    fn test_editor_resets_when_target_changes() {
        EDITING.with(|m| *m.borrow_mut() = FormMode::Edit(project(1, "Alpha")));
        let mut dom = VirtualDom::new(EditorHost);
        dom.rebuild_in_place();
        let html = dioxus_ssr::render(&dom);
        assert!(html.contains("value=\"Alpha\""));

        EDITING.with(|m| *m.borrow_mut() = FormMode::Edit(project(2, "Beta")));
        dom.mark_dirty(ScopeId::APP);
        dom.render_immediate(&mut NoOpMutations);
        let html = dioxus_ssr::render(&dom);
        assert!(html.contains("value=\"Beta\""));
        assert!(html.contains("value=\"beta\""));
        assert!(!html.contains("Alpha"));
        assert!(!html.contains("alpha"));
    }

    #[test]
    fn test_form_mode_keys() {
        assert_eq!(FormMode::Create.key(), "new");
        assert_eq!(FormMode::Edit(project(7, "Search")).key(), "edit-7");
        assert_ne!(
            FormMode::Edit(project(1, "Alpha")).key(),
            FormMode::Edit(project(2, "Alpha")).key()
        );
        assert_eq!(FormMode::Edit(project(7, "Search")).initial().tags, vec!["search"]);
        assert!(FormMode::Create.initial().name.is_empty());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" shop, payments ,,shop"), vec!["shop", "payments"]);
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_matches_search() {
        let project: Project = serde_json::from_str(r#"{"id": 1, "name": "Checkout Service"}"#).unwrap();
        assert!(matches_search(&project, "checkout"));
        assert!(matches_search(&project, " SERVICE "));
        assert!(matches_search(&project, ""));
        assert!(!matches_search(&project, "search"));
    }
}
