//! Data feeds for the dashboard.
//!
//! A [`DataSource`] produces metrics snapshots and timeline events. The HTTP
//! source polls a metrics server; the random source fabricates demo data.

mod error;
mod http;
mod random;
mod types;

pub use error::FetchError;
pub use http::HttpSource;
pub use random::RandomSource;
pub use types::{MetricsSnapshot, TimelineEvent, TimelineResponse};

use crate::config::{SourceConfig, SourceMode};
use async_trait::async_trait;
use std::sync::Arc;

/// Something the refresh loop can poll.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Fetch the current metrics snapshot.
    async fn fetch_metrics(&self) -> Result<MetricsSnapshot, FetchError>;

    /// Fetch the current block-occupancy timeline.
    async fn fetch_timeline(&self) -> Result<Vec<TimelineEvent>, FetchError>;

    /// Whether snapshots carry server alerts. A source that never does
    /// leaves the alert log to local synthesis.
    fn provides_alerts(&self) -> bool {
        true
    }
}

/// Build the source selected by configuration.
pub fn from_config(config: &SourceConfig) -> Result<Arc<dyn DataSource>, FetchError> {
    match config.mode {
        SourceMode::Http => Ok(Arc::new(HttpSource::new(config)?)),
        SourceMode::Random => Ok(Arc::new(RandomSource::new())),
    }
}
