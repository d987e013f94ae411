//! REST API access

mod client;
mod errors;
mod session;

pub use client::{ApiClient, ApiConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use errors::ApiError;
pub use session::Session;
