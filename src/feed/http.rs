//! HTTP polling source for `/metrics` and `/timeline`.

use super::{DataSource, FetchError, MetricsSnapshot, TimelineEvent, TimelineResponse};
use crate::config::SourceConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Polls a metrics server over plain HTTP GET.
pub struct HttpSource {
    client: reqwest::Client,
    metrics_url: String,
    timeline_url: String,
    timeout_seconds: u64,
}

impl HttpSource {
    /// Create a source with a pooled client honoring the configured timeout.
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self::with_client(config, client))
    }

    /// Create a source with a custom HTTP client (for testing).
    pub fn with_client(config: &SourceConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            metrics_url: config.endpoint("/metrics"),
            timeline_url: config.endpoint("/timeline"),
            timeout_seconds: config.timeout_seconds,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_seconds))?;

        if !response.status().is_success() {
            return Err(FetchError::Http(response.status().as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_seconds))
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_metrics(&self) -> Result<MetricsSnapshot, FetchError> {
        self.get_json(&self.metrics_url).await
    }

    async fn fetch_timeline(&self) -> Result<Vec<TimelineEvent>, FetchError> {
        let body: TimelineResponse = self.get_json(&self.timeline_url).await?;
        Ok(body.timeline)
    }
}
