//! Reusable Dioxus RSX components for the CO2 dashboard.

mod breadcrumbs;
mod chart_container;
mod chart_header;
mod date_range_picker;
mod empty_state;
mod error_display;
mod historical_chart;
mod loading_spinner;
mod series_toggles;
mod tag_filter;

pub use breadcrumbs::Breadcrumbs;
pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use date_range_picker::DateRangePicker;
pub use empty_state::{EmptyState, NO_HISTORICAL_DATA};
pub use error_display::ErrorDisplay;
pub use historical_chart::HistoricalChart;
pub use loading_spinner::LoadingSpinner;
pub use series_toggles::SeriesToggles;
pub use tag_filter::TagFilter;
