//! Chart container component with loading overlay.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// The DOM id D3 renders into
    pub id: String,
    /// Shown over the previous chart while a refetch is in flight
    #[props(default = false)]
    pub refreshing: bool,
    #[props(default = 400)]
    pub min_height: u32,
}

/// A container div for D3.js charts. The last chart stays visible, dimmed,
/// while newer data loads.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; position: relative; width: 100%;",
        props.min_height
    );
    let chart_style = if props.refreshing {
        "width: 100%; opacity: 0.4;"
    } else {
        "width: 100%;"
    };

    rsx! {
        div {
            style: "{style}",
            if props.refreshing {
                div {
                    style: "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #666; z-index: 1;",
                    "Updating chart..."
                }
            }
            div {
                id: "{props.id}",
                style: "{chart_style}",
            }
        }
    }
}
