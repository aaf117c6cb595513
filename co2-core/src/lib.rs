pub mod cicd;
pub mod date_range;
pub mod error;
pub mod historical;
pub mod operations;
pub mod project;
mod serde_time;
pub mod user_flow;

#[cfg(feature = "api")]
pub mod client;

pub use error::{ApiError, Result};
