//! Loan Backend REST Client
//!
//! HTTP client for the loan backend's JSON API.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

use super::error::{ApiError, ApiResult};
use super::Backend;

/// Default backend base URL (local development server)
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. "http://localhost:8000"
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: None,
        }
    }
}

/// reqwest-backed implementation of [`Backend`]
///
/// Single attempt per call: no retries, no backoff.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<Value> {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "Sending backend request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(method = %method, url = %url, status = status.as_u16(), "Backend rejected request");
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
