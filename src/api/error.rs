//! API client error types

use thiserror::Error;

/// Errors raised while talking to the loan backend
///
/// Every variant means "the request failed". A non-success status displays
/// as the raw response body so it can be shown to the user verbatim.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// Connection refused, DNS failure, timeout, ...
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("Invalid response: {0}")]
    Decode(String),

    /// HTTP client could not be constructed
    #[error("Client error: {0}")]
    Client(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type alias for backend calls
pub type ApiResult<T> = Result<T, ApiError>;
