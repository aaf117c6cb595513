//! CO2 Observability Dashboard
//!
//! A single-page app that charts the carbon footprint of software projects:
//! a cross-project overview, per-project SDLC breakdowns, infrastructure
//! (operations) and CI/CD pipeline emissions, down to single elements and
//! pipeline runs.
//!
//! Data flow:
//! 1. The location hash (`#/projects/3/operations`) selects the view and is
//!    kept in the session held by `AppState`.
//! 2. Each view fetches from the metrics API through `use_retrieval`.
//! 3. History records are filtered to the picker window, reshaped into
//!    date-aligned series and handed to the D3.js charts.

mod views;

use co2_chart_ui::components::{Breadcrumbs, ErrorDisplay};
use co2_chart_ui::config::DashboardConfig;
use co2_chart_ui::js_bridge;
use co2_chart_ui::state::AppState;
use co2_data::session::{Session, View};
use dioxus::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("main"))
        .launch(App);
}

fn location_hash() -> String {
    web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .unwrap_or_default()
}

/// Follow back/forward and hash links into the session.
fn watch_location(mut state: AppState) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let on_hash_change = Closure::<dyn FnMut()>::new(move || {
        let hash = location_hash();
        match View::from_path(&hash) {
            Some(view) if view != state.session.peek().view() => {
                log::info!("Location changed to {}", view.path());
                state.session.write().navigate(view);
            }
            Some(_) => {}
            None => log::warn!("Ignoring unknown location {:?}", hash),
        }
    });
    window.set_onhashchange(Some(on_hash_change.as_ref().unchecked_ref()));
    on_hash_change.forget();
}

#[component]
fn App() -> Element {
    let state = use_context_provider(|| {
        AppState::new(
            &DashboardConfig::from_build_env(),
            Session::from_hash(&location_hash()),
        )
    });

    use_hook(move || {
        js_bridge::init_charts();
        watch_location(state);
    });

    let view = state.session.read().view();

    rsx! {
        div {
            style: "padding: 16px 24px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 1280px; margin: 0 auto;",

            header {
                style: "display: flex; align-items: baseline; gap: 12px; margin-bottom: 8px;",
                h1 { style: "margin: 0; font-size: 22px;", "CO2 Observability Dashboard" }
            }

            if let Some(message) = (state.config_error)() {
                ErrorDisplay { message }
            }

            Breadcrumbs {}

            // Keyed so every view change mounts the page with fresh hooks
            for view in [view] {
                Page { key: "{view.path()}", view }
            }
        }
    }
}

#[component]
fn Page(view: View) -> Element {
    match view {
        View::Projects => rsx! { views::ProjectsPage {} },
        View::Project { id } => rsx! { views::ProjectPage { id } },
        View::Operations { project_id } => rsx! { views::OperationsPage { project_id } },
        View::InfrastructureElement {
            project_id,
            element_id,
        } => rsx! { views::InfrastructureElementPage { project_id, element_id } },
        View::Cicd { project_id } => rsx! { views::CicdPage { project_id } },
        View::Pipeline {
            project_id,
            pipeline_id,
        } => rsx! { views::PipelinePage { project_id, pipeline_id } },
    }
}
