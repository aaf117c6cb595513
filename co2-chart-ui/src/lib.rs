//! Shared Dioxus components and D3.js bridge for the CO2 dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the D3.js line and bar charts via `js_sys::eval()`
//! - `state`: `AppState` with the session and API client behind Dioxus Signals
//! - `hooks`: `use_retrieval` and `use_series_chart`
//! - `components`: Reusable RSX components (charts, pickers, breadcrumbs, etc.)
//! - `config`: build-time settings

pub mod components;
pub mod config;
pub mod hooks;
pub mod js_bridge;
pub mod state;
