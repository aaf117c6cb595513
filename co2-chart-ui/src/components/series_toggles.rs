//! One checkbox per series of a history chart.

use crate::hooks::SeriesChart;
use dioxus::prelude::*;

#[component]
pub fn SeriesToggles(chart: SeriesChart) -> Element {
    let mut selection = chart.selection;
    let names = chart.reshaped.read().labels();

    rsx! {
        div {
            style: "display: flex; flex-wrap: wrap; gap: 8px 16px; margin-top: 8px;",
            for name in names {
                label {
                    key: "{name}",
                    style: "display: flex; align-items: center; gap: 4px; font-size: 13px;",
                    input {
                        r#type: "checkbox",
                        checked: selection.read().is_visible(&name),
                        onchange: {
                            let name = name.clone();
                            move |_| selection.write().toggle(&name)
                        },
                    }
                    "{name}"
                }
            }
        }
    }
}
