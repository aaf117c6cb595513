//! Build-time dashboard configuration.

/// Used when `CO2_API_DOMAIN` is unset at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the metrics API, without a trailing slash
    pub api_url: String,
}

impl DashboardConfig {
    /// Read `CO2_API_DOMAIN` as captured by the compiler.
    pub fn from_build_env() -> Self {
        Self::with_api_url(option_env!("CO2_API_DOMAIN"))
    }

    fn with_api_url(value: Option<&str>) -> Self {
        let api_url = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        Self { api_url }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::with_api_url(None)
    }
}
