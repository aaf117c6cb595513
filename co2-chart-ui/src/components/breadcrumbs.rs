//! `Home › projects › 3 › operations`

use crate::state::AppState;
use dioxus::prelude::*;

/// Trail for the current view. Links are hash links, so the browser's
/// history drives navigation.
#[component]
pub fn Breadcrumbs() -> Element {
    let state = use_context::<AppState>();
    let crumbs = state.session.read().breadcrumbs();
    let last = crumbs.len().saturating_sub(1);

    rsx! {
        nav {
            style: "margin-bottom: 16px; font-size: 14px; color: #666;",
            for (i, crumb) in crumbs.into_iter().enumerate() {
                if i > 0 {
                    span { style: "margin: 0 6px;", "›" }
                }
                if i == last {
                    span { style: "color: #222;", "{crumb.label}" }
                } else {
                    a {
                        href: "#{crumb.path}",
                        style: "color: #1565C0; text-decoration: none;",
                        "{crumb.label}"
                    }
                }
            }
        }
    }
}
