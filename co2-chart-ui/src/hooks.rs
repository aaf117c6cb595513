//! Hooks shared by the dashboard views.

use crate::js_bridge::{self, ChartConfig, ChartKind};
use co2_core::date_range::DateRange;
use co2_data::filter::filter;
use co2_data::reshape::{reshape, Reshaped, TimeSeriesRecord};
use co2_data::retrieval::Retrieval;
use co2_data::selection::ActiveSelection;
use dioxus::prelude::*;
use std::future::Future;

/// Run `fetch` whenever a signal it reads changes and track the result.
///
/// `fetch` must read its parameters synchronously and return a future that
/// owns them. Failures are logged in full and surfaced as `failure`.
pub fn use_retrieval<T, F, Fut>(failure: &'static str, mut fetch: F) -> Signal<Retrieval<T>>
where
    T: 'static,
    F: FnMut() -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<T>> + 'static,
{
    let mut state = use_signal(Retrieval::<T>::new);

    use_effect(move || {
        let request = fetch();
        let ticket = state.write().begin();
        spawn(async move {
            let result = request.await.map_err(|e| {
                log::error!("{}: {:#}", failure, e);
                failure.to_string()
            });
            state.write().resolve(ticket, result);
        });
    });

    state
}

/// Records of `retrieval` inside `range`, reshaped. Empty until the first
/// successful fetch.
pub fn chart_data(retrieval: &Retrieval<Vec<TimeSeriesRecord>>, range: &DateRange) -> Reshaped {
    match retrieval.data() {
        Some(all) => reshape(&filter(all, range)),
        None => Reshaped::default(),
    }
}

/// Handles for one grouped history chart.
#[derive(Clone, Copy, PartialEq)]
pub struct SeriesChart {
    /// DOM id D3 renders into
    pub id: &'static str,
    /// Filtered and reshaped records, every series
    pub reshaped: Memo<Reshaped>,
    pub selection: Signal<ActiveSelection>,
}

/// Filter, reshape and draw `records` within `range`.
///
/// The visible series are seeded from the first non-empty grouping and then
/// only change through [`SeriesChart::selection`].
pub fn use_series_chart(
    id: &'static str,
    kind: ChartKind,
    title: &'static str,
    records: Signal<Retrieval<Vec<TimeSeriesRecord>>>,
    range: Signal<DateRange>,
) -> SeriesChart {
    let reshaped = use_memo(move || chart_data(&records.read(), &range()));

    let mut selection = use_signal(ActiveSelection::new);

    use_effect(move || {
        let labels = reshaped.read().labels();
        if !selection.peek().is_seeded() && !labels.is_empty() {
            log::info!("{}: showing {} series", id, labels.len());
            selection.write().seed(labels);
        }
    });

    use_effect(move || {
        let shown = reshaped.read().only(selection.read().visible());
        if shown.is_empty() {
            js_bridge::destroy_chart(id);
            return;
        }
        js_bridge::render_series(id, kind, &shown, &ChartConfig::new(title));
    });

    SeriesChart {
        id,
        reshaped,
        selection,
    }
}
