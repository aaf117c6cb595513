//! A grouped history chart with its date pickers, toggles and states.

use crate::components::{
    ChartContainer, ChartHeader, DateRangePicker, EmptyState, ErrorDisplay, LoadingSpinner,
    SeriesToggles,
};
use crate::hooks::SeriesChart;
use co2_core::date_range::DateRange;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct HistoricalChartProps {
    pub title: String,
    pub chart: SeriesChart,
    pub range: Signal<DateRange>,
    #[props(default = false)]
    pub loading: bool,
    #[props(default)]
    pub error: Option<String>,
    /// Show per-series checkboxes
    #[props(default = true)]
    pub toggles: bool,
}

#[component]
pub fn HistoricalChart(props: HistoricalChartProps) -> Element {
    let has_data = !props.chart.reshaped.read().is_empty();

    rsx! {
        section {
            style: "margin: 16px 0;",
            ChartHeader {
                title: props.title.clone(),
                subtitle: "Grams of CO2 equivalent (g CO2e)".to_string(),
            }
            DateRangePicker { range: props.range }

            if let Some(message) = props.error.clone() {
                ErrorDisplay { message }
            } else if !has_data && props.loading {
                LoadingSpinner { label: "Loading historical data...".to_string() }
            } else if !has_data {
                EmptyState {}
            } else {
                ChartContainer {
                    id: props.chart.id.to_string(),
                    refreshing: props.loading,
                }
                if props.toggles {
                    SeriesToggles { chart: props.chart }
                }
            }
        }
    }
}
