/// Error types for the metrics API
use thiserror::Error;

/// Main error type for metrics API operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request could not be sent or its body could not be read
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// Response body was not the JSON we expected
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response was valid JSON but of the wrong shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Base URL could not be combined with an endpoint path
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Type alias for Results using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
