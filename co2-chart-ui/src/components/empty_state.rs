use dioxus::prelude::*;

/// Shown when a history request succeeds with nothing to draw.
pub const NO_HISTORICAL_DATA: &str = "No historical data available";

#[component]
pub fn EmptyState(#[props(default = NO_HISTORICAL_DATA.to_string())] message: String) -> Element {
    rsx! {
        div {
            style: "padding: 40px; text-align: center; color: #888; border: 1px dashed #ccc; border-radius: 4px;",
            "{message}"
        }
    }
}
