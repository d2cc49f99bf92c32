//! HTTP clients for the services AssetVerse talks to.
//!
//! Provides a minimal JSON/multipart client ([`ApiClient`]) plus the three external
//! boundaries the application components depend on: the trusted backend
//! ([`backend`]), the media host ([`media_host`]) and the identity provider
//! ([`identity`]). Each boundary is a trait so components can be driven by test doubles.

pub mod backend;
pub mod error_body;
pub mod identity;
pub mod media_host;

use anyhow::{Context, Result};
use assetverse_core::ClientConfig;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use backend::{BackendClient, FolderBackend, SignatureBackend};
pub use identity::{IdentityProvider, StaticIdentityProvider};
pub use media_host::{MediaHost, MediaHostClient};

/// Why an HTTP exchange did not produce the expected JSON body.
#[derive(Debug, thiserror::Error)]
pub enum HttpFailure {
    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse response as JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

impl HttpFailure {
    /// Parsed JSON error body, when the failure carried one.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match self {
            HttpFailure::Status { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

/// HTTP client bound to one base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for the trusted backend described by `config`.
    pub fn backend(config: &ClientConfig) -> Result<Self> {
        Self::new(
            &config.backend_url,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Client for the media host described by `config`.
    pub fn media_host(config: &ClientConfig) -> Result<Self> {
        Self::new(
            &config.media_host_url,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpFailure> {
        let request = self.client.post(self.build_url(path)).json(body);
        Self::execute(request).await
    }

    /// POST without a body and deserialize response.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpFailure> {
        let request = self.client.post(self.build_url(path));
        Self::execute(request).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, HttpFailure> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        Self::execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, HttpFailure> {
        let response = request.send().await.map_err(HttpFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpFailure::Status { status, body });
        }

        response.json().await.map_err(HttpFailure::Decode)
    }
}
