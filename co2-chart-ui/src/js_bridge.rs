//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! D3.js chart functions live in `assets/js/*.js`, are embedded at compile
//! time and evaluated as globals once D3 has loaded. Rust hands them the
//! JSON form of a [`Reshaped`] matrix plus a [`ChartConfig`].

use co2_data::reshape::Reshaped;
use serde::Serialize;

static TOOLTIP_JS: &str = include_str!("../assets/js/tooltip.js");
static LINE_CHART_JS: &str = include_str!("../assets/js/line-chart.js");
static BAR_CHART_JS: &str = include_str!("../assets/js/bar-chart.js");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One line per series, gaps where a series has no value
    Line,
    /// Grouped bars per date
    Bar,
}

impl ChartKind {
    fn js_function(&self) -> &'static str {
        match self {
            ChartKind::Line => "renderLineChart",
            ChartKind::Bar => "renderBarChart",
        }
    }
}

/// Chart options passed through to the D3 renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub title: String,
    pub y_axis_label: String,
    /// d3.timeFormat pattern for the x-axis ticks
    pub date_format: String,
}

impl ChartConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_axis_label: "CO2 (g CO2e)".to_string(),
            date_format: "%b %d".to_string(),
        }
    }
}

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('CO2 JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Make `raw` safe to embed in a single-quoted JS string literal.
pub fn escape_js_arg(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "")
}

/// Wait for D3, then evaluate the chart scripts at global scope.
///
/// Call once at app startup. The scripts declare plain functions, so they
/// are promoted to `window.*` explicitly after the indirect eval.
pub fn init_charts() {
    let all_js = [TOOLTIP_JS, LINE_CHART_JS, BAR_CHART_JS].join("\n");

    let store_js = format!(
        "window.__co2ChartScripts = {};",
        serde_json::to_string(&all_js).unwrap_or_default()
    );
    let _ = js_sys::eval(&store_js);

    let init_js = r#"
        (function() {
            var waitForD3 = setInterval(function() {
                if (typeof d3 !== 'undefined') {
                    clearInterval(waitForD3);
                    (0, eval)(window.__co2ChartScripts);
                    delete window.__co2ChartScripts;
                    if (typeof renderLineChart !== 'undefined') window.renderLineChart = renderLineChart;
                    if (typeof renderBarChart !== 'undefined') window.renderBarChart = renderBarChart;
                    if (typeof initTooltip !== 'undefined') window.initTooltip = initTooltip;
                    if (typeof showTooltip !== 'undefined') window.showTooltip = showTooltip;
                    if (typeof hideTooltip !== 'undefined') window.hideTooltip = hideTooltip;
                    window.__co2ChartsReady = true;
                    console.log('CO2 charts initialized');
                }
            }, 100);
        })();
    "#;
    let _ = js_sys::eval(init_js);
}

/// Give up on a container that never mounts after this many 100ms polls.
const MAX_POLLS: u32 = 300;

/// JS that cancels any poll still pending for `container_id`, then polls
/// until the scripts are loaded and the container exists and calls
/// `window.<function>(container_id, data, config)`.
///
/// Pending polls live in `window.__co2PendingCharts`, one per container, so
/// a newer render or a [`destroy_chart`] always supersedes an older one.
fn render_script(function: &str, container_id: &str, data_json: &str, config_json: &str) -> String {
    let id = escape_js_arg(container_id);
    let data = escape_js_arg(data_json);
    let config = escape_js_arg(config_json);
    format!(
        r#"
        (function() {{
            var pending = window.__co2PendingCharts = window.__co2PendingCharts || {{}};
            if (pending['{id}']) clearInterval(pending['{id}']);
            var tries = 0;
            var poll = setInterval(function() {{
                tries += 1;
                if (window.__co2ChartsReady &&
                    typeof window.{function} !== 'undefined' &&
                    document.getElementById('{id}')) {{
                    clearInterval(poll);
                    delete pending['{id}'];
                    try {{
                        window.{function}('{id}', '{data}', '{config}');
                    }} catch(e) {{ console.error('[CO2] {function} error:', e); }}
                }} else if (tries >= {MAX_POLLS}) {{
                    clearInterval(poll);
                    delete pending['{id}'];
                    console.warn('[CO2] gave up waiting for #{id}');
                }}
            }}, 100);
            pending['{id}'] = poll;
        }})();
        "#,
    )
}

/// JS that cancels the pending render for `container_id` and empties it.
fn destroy_script(container_id: &str) -> String {
    let id = escape_js_arg(container_id);
    format!(
        r#"
        var pending = window.__co2PendingCharts || {{}};
        if (pending['{id}']) {{ clearInterval(pending['{id}']); delete pending['{id}']; }}
        var el = document.getElementById('{id}');
        if (el) el.innerHTML = '';
        "#,
    )
}

fn render_when_ready(function: &str, container_id: &str, data_json: &str, config_json: &str) {
    call_js(&render_script(function, container_id, data_json, config_json));
}

pub fn render_line_chart(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready(ChartKind::Line.js_function(), container_id, data_json, config_json);
}

pub fn render_bar_chart(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready(ChartKind::Bar.js_function(), container_id, data_json, config_json);
}

/// Serialize `reshaped` and draw it with the renderer for `kind`.
pub fn render_series(container_id: &str, kind: ChartKind, reshaped: &Reshaped, config: &ChartConfig) {
    let data_json = match serde_json::to_string(reshaped) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize chart data for {}: {}", container_id, e);
            return;
        }
    };
    let config_json = serde_json::to_string(config).unwrap_or_default();
    log::debug!(
        "Rendering {} series over {} dates into {}",
        reshaped.series.len(),
        reshaped.dates.len(),
        container_id
    );
    match kind {
        ChartKind::Line => render_line_chart(container_id, &data_json, &config_json),
        ChartKind::Bar => render_bar_chart(container_id, &data_json, &config_json),
    }
}

/// Destroy/clean up a chart in the given container, dropping any render
/// still waiting for D3 or the container.
pub fn destroy_chart(container_id: &str) {
    call_js(&destroy_script(container_id));
}
