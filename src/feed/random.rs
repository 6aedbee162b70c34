//! Offline source that fabricates KPIs for demos.

use super::{DataSource, FetchError, MetricsSnapshot, TimelineEvent};
use async_trait::async_trait;
use rand::Rng;

/// Fabricates a fresh snapshot on every poll. Never fails.
///
/// Ranges: on-time 0-99 %, speed 40-119 km/h, efficiency 0-99 %,
/// 0-9 active trains, 0-14 min delay. No alerts and no timeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSource;

impl RandomSource {
    pub fn new() -> Self {
        Self
    }

    /// Draw one snapshot from the given RNG.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> MetricsSnapshot {
        MetricsSnapshot {
            active_trains: rng.random_range(0..10),
            efficiency: f64::from(rng.random_range(0u32..100)),
            avg_delay: f64::from(rng.random_range(0u32..15)),
            on_time: f64::from(rng.random_range(0u32..100)),
            avg_speed: f64::from(rng.random_range(40u32..120)),
            alerts: Vec::new(),
        }
    }
}

#[async_trait]
impl DataSource for RandomSource {
    fn name(&self) -> &'static str {
        "random"
    }

    async fn fetch_metrics(&self) -> Result<MetricsSnapshot, FetchError> {
        Ok(Self::sample(&mut rand::rng()))
    }

    async fn fetch_timeline(&self) -> Result<Vec<TimelineEvent>, FetchError> {
        Ok(Vec::new())
    }

    fn provides_alerts(&self) -> bool {
        false
    }
}
