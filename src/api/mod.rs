//! Backend API
//!
//! Thin JSON-over-HTTP layer in front of the loan backend.
//!
//! ## Architecture
//!
//! - **Backend**: the seam the store talks to (`request(method, path, body)`)
//! - **ApiClient**: reqwest implementation used by the binary
//! - **fetch_collection / create**: typed helpers over any `Backend`

mod client;
mod error;

pub use client::{ApiClient, ClientConfig, DEFAULT_BACKEND_URL};
pub use error::{ApiError, ApiResult};
pub use reqwest::Method;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A JSON REST backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Issue one request and return the parsed JSON body
    ///
    /// Implementations always send a JSON content type and map non-success
    /// statuses to [`ApiError::RequestFailed`] carrying the raw body text.
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<Value>;
}

/// GET a collection and decode it as a list of records
pub async fn fetch_collection<T: DeserializeOwned>(
    backend: &dyn Backend,
    path: &str,
) -> ApiResult<Vec<T>> {
    let body = backend.request(Method::GET, path, None).await?;
    Ok(serde_json::from_value(body)?)
}

/// POST one record; returns whatever the backend echoes back
pub async fn create(backend: &dyn Backend, path: &str, payload: &Value) -> ApiResult<Value> {
    backend.request(Method::POST, path, Some(payload)).await
}
