//! HTTP client for the Landmark API.
//!
//! Provides generic request helpers, typed domain methods for every resource,
//! and the [`FormSubmitter`] upload transport used for image-backed forms.
//! The CLI uses this client directly.

pub mod api;
pub mod error;
pub mod submit;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::{ClientError, ClientResult};
pub use submit::{ContentForm, FormSubmitter};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Prefix every resource route is mounted under.
pub const API_PREFIX: &str = "/api";

/// HTTP client for the Landmark API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(60))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: LANDMARK_API_URL, defaulting to a local server.
    pub fn from_env() -> ClientResult<Self> {
        let base_url =
            std::env::var("LANDMARK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a prepared request and deserialize a success body.
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "API request failed");
            return Err(ClientError::from_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.client.post(self.build_url(path)).json(body))
            .await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ClientResult<T> {
        self.send(self.client.post(self.build_url(path)).multipart(form))
            .await
    }

    /// PUT multipart form and deserialize response.
    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ClientResult<T> {
        self.send(self.client.put(self.build_url(path)).multipart(form))
            .await
    }

    /// PATCH without a body.
    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.patch(self.build_url(path))).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.delete(self.build_url(path))).await
    }
}
