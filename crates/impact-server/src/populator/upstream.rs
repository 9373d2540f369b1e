//! Fuentes de datos de plataformas externas.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use impact_core::Post;
use thiserror::Error;
use tracing::{debug, instrument};

use super::transform::{PlatformKind, transform};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("no URL configured for {0}")]
    NotConfigured(String),

    #[error("request to {platform} failed: {source}")]
    Request {
        platform: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Fuente de posts de una plataforma.
#[async_trait]
pub trait PlatformSource: Send + Sync {
    /// Nombre mostrado de la plataforma (`Facebook`, `LinkedIn`, ...).
    fn platform(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<Post>, UpstreamError>;
}

/// Fuente HTTP: GET a `url` con la API key como query parameter.
pub struct HttpPlatformSource {
    platform: String,
    kind: PlatformKind,
    url: Option<String>,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpPlatformSource {
    pub fn new(
        platform: impl Into<String>,
        kind: PlatformKind,
        url: Option<String>,
        api_key: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            platform: platform.into(),
            kind,
            url,
            api_key,
            client,
        }
    }

    /// Cliente compartido con timeout por request.
    pub fn client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder().timeout(timeout).build()
    }
}

#[async_trait]
impl PlatformSource for HttpPlatformSource {
    fn platform(&self) -> &str {
        &self.platform
    }

    #[instrument(skip(self), fields(platform = %self.platform))]
    async fn fetch(&self) -> Result<Vec<Post>, UpstreamError> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| UpstreamError::NotConfigured(self.platform.clone()))?;

        let wrap = |source| UpstreamError::Request {
            platform: self.platform.clone(),
            source,
        };

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.query(&[(self.kind.key_param(), key.as_str())]);
        }

        let payload: serde_json::Value = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(wrap)?
            .json()
            .await
            .map_err(wrap)?;

        let posts = transform(self.kind, &payload, Utc::now());
        debug!(posts = posts.len(), "Platform payload transformed");
        Ok(posts)
    }
}
