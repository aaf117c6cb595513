//! Project tags in use plus the AND/OR switch sent as `matchAll`.

use dioxus::prelude::*;

#[component]
pub fn TagFilter(tags: Vec<String>, match_all: Signal<bool>) -> Element {
    let mut match_all = match_all;
    let checked = match_all();

    rsx! {
        div {
            style: "display: flex; flex-wrap: wrap; gap: 6px; align-items: center; margin: 8px 0;",
            span { style: "font-weight: bold;", "Tags:" }
            if tags.is_empty() {
                span { style: "color: #888;", "none" }
            }
            for tag in tags.iter() {
                span {
                    key: "{tag}",
                    style: "padding: 2px 8px; border-radius: 12px; background: #E3F2FD; font-size: 12px;",
                    "{tag}"
                }
            }
            label {
                style: "margin-left: 12px;",
                input {
                    r#type: "checkbox",
                    checked,
                    onchange: move |evt: Event<FormData>| match_all.set(evt.checked()),
                }
                " Match all tags"
            }
        }
    }
}
