//! Start and end date inputs bound to a view's window.

use co2_core::date_range::DateRange;
use co2_utils::dates::{format_date, parse_date};
use dioxus::prelude::*;

/// Edits `range` day by day: the start snaps to midnight, the end to the
/// last millisecond of the chosen day. Unparseable input is ignored.
#[component]
pub fn DateRangePicker(range: Signal<DateRange>) -> Element {
    let mut range = range;
    let current = range();
    let start = format_date(&current.start.date_naive());
    let end = format_date(&current.end.date_naive());

    let on_start_change = move |evt: Event<FormData>| match parse_date(&evt.value()) {
        Ok(day) => {
            let next = range.peek().with_start_day(day);
            range.set(next);
        }
        Err(e) => log::warn!("Ignoring start date: {}", e),
    };

    let on_end_change = move |evt: Event<FormData>| match parse_date(&evt.value()) {
        Ok(day) => {
            let next = range.peek().with_end_day(day);
            range.set(next);
        }
        Err(e) => log::warn!("Ignoring end date: {}", e),
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 12px; align-items: center;",
            label {
                style: "font-weight: bold;",
                "Start Date: "
                input {
                    r#type: "date",
                    value: "{start}",
                    onchange: on_start_change,
                }
            }
            label {
                style: "font-weight: bold;",
                "End Date: "
                input {
                    r#type: "date",
                    value: "{end}",
                    onchange: on_end_change,
                }
            }
            if current.is_empty() {
                span {
                    style: "color: #C62828; font-size: 12px;",
                    "Start date is after end date"
                }
            }
        }
    }
}
