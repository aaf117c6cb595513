//! Application state managed via Dioxus context.
//!
//! `AppState` bundles the session and the API client into a single struct
//! provided via `use_context_provider`. Child components retrieve it with
//! `use_context::<AppState>()`.

use crate::config::DashboardConfig;
use co2_core::client::ApiClient;
use co2_data::session::Session;
use dioxus::prelude::*;

#[derive(Clone, Copy)]
pub struct AppState {
    /// Current view, active project and breadcrumb names
    pub session: Signal<Session>,
    /// None when the configured API URL was rejected
    pub api: Signal<Option<ApiClient>>,
    /// Why `api` is None
    pub config_error: Signal<Option<String>>,
}

impl AppState {
    pub fn new(config: &DashboardConfig, session: Session) -> Self {
        let (api, config_error) = match ApiClient::new(&config.api_url) {
            Ok(client) => {
                log::info!("Using metrics API at {}", client.base_url());
                (Some(client), None)
            }
            Err(e) => {
                log::error!("Invalid API configuration: {}", e);
                (None, Some(e.to_string()))
            }
        };
        Self {
            session: Signal::new(session),
            api: Signal::new(api),
            config_error: Signal::new(config_error),
        }
    }

    /// A handle to the API client for use inside async tasks.
    pub fn client(&self) -> anyhow::Result<ApiClient> {
        self.api
            .peek()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("API client is not configured"))
    }
}
