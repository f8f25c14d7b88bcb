//! Point-of-sale REST collaborators.
//!
//! Every collaborator is a trait with an HTTP implementation sharing one
//! [`ApiClient`]. Paths are relative to `{base_url}/api`.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{ApiConfig, ConfigError};

mod catalog;
mod customers;
mod orders;
mod payments;
mod settings;

pub use catalog::*;
pub use customers::*;
pub use orders::*;
pub use payments::*;
pub use settings::*;

/// Errors returned by the point-of-sale API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or undecodable body.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-2xx status.
    #[error("{message}")]
    Status {
        /// Response status.
        status: StatusCode,

        /// Service-provided `detail`, or the raw body.
        message: String,
    },
}

/// Shared HTTP client for the point-of-sale API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            http,
        })
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}/api{path}", self.base_url));

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(ApiError::Status {
                status,
                message: error_message(status, &body),
            });
        }

        Ok(response.json().await?)
    }
}

/// The service's `detail` field when present, else the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(detail)) => detail,
        Some(serde_json::Value::Null) | None if body.trim().is_empty() => {
            format!("request failed with status {status}")
        }
        Some(serde_json::Value::Null) | None => body.trim().to_string(),
        Some(other) => other.to_string(),
    }
}
