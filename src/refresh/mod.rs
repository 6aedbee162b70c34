//! Polling-driven view refresh.
//!
//! Three recurring timers feed the dashboard:
//! - metrics poll (immediately, then every `metrics_interval_ms`)
//! - timeline poll (immediately, then every `timeline_interval_ms`)
//! - local alert synthesis (every `alert_interval_ms`, first after one period)
//!
//! A failed poll is logged and leaves the dashboard at its last good values;
//! the next tick simply tries again.

pub mod scheduler;

pub use scheduler::{Scheduler, TimerHandle, TimerStats};

use crate::alerts::AlertSynthesizer;
use crate::config::RefreshConfig;
use crate::dashboard::SharedDashboard;
use crate::feed::DataSource;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Timer names
pub const METRICS_TIMER: &str = "metrics";
pub const TIMELINE_TIMER: &str = "timeline";
pub const ALERTS_TIMER: &str = "alerts";

/// Notification sent after the dashboard changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshEvent {
    MetricsUpdated,
    MetricsFailed,
    TimelineUpdated,
    TimelineFailed,
    AlertSynthesized,
}

/// Drives the dashboard from a data source.
pub struct RefreshLoop {
    dashboard: SharedDashboard,
    source: Arc<dyn DataSource>,
    config: RefreshConfig,
    synthesizer: AlertSynthesizer,
    events: Option<broadcast::Sender<RefreshEvent>>,
}

impl RefreshLoop {
    pub fn new(
        dashboard: SharedDashboard,
        source: Arc<dyn DataSource>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            dashboard,
            source,
            config,
            synthesizer: AlertSynthesizer::new(),
            events: None,
        }
    }

    /// Use a custom alert synthesizer.
    pub fn with_synthesizer(mut self, synthesizer: AlertSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Set the broadcast sender notified after each dashboard change.
    pub fn with_events(mut self, sender: broadcast::Sender<RefreshEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn dashboard(&self) -> &SharedDashboard {
        &self.dashboard
    }

    /// One metrics tick. Returns true if the dashboard was updated.
    pub async fn poll_metrics(&self) -> bool {
        let start = Instant::now();
        let result = self.source.fetch_metrics().await;
        let latency = start.elapsed();
        record_poll(METRICS_TIMER, latency.as_secs_f64(), result.is_ok());

        // Network I/O is done before taking the lock
        let mut dashboard = self.dashboard.lock().await;
        match result {
            Ok(snapshot) => {
                tracing::debug!(
                    source = self.source.name(),
                    latency_ms = latency.as_millis() as u64,
                    active_trains = snapshot.active_trains,
                    alerts = snapshot.alerts.len(),
                    "Metrics updated"
                );
                if self.source.provides_alerts() {
                    dashboard.apply_metrics(&snapshot);
                } else {
                    dashboard.apply_kpis(&snapshot);
                }
                drop(dashboard);
                self.notify(RefreshEvent::MetricsUpdated);
                true
            }
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    error = %e,
                    kind = e.kind(),
                    "Error loading metrics"
                );
                dashboard.metrics_failed(&e);
                drop(dashboard);
                self.notify(RefreshEvent::MetricsFailed);
                false
            }
        }
    }

    /// One timeline tick. Returns true if the chart was rebuilt.
    pub async fn poll_timeline(&self) -> bool {
        let start = Instant::now();
        let result = self.source.fetch_timeline().await;
        let latency = start.elapsed();
        record_poll(TIMELINE_TIMER, latency.as_secs_f64(), result.is_ok());

        let mut dashboard = self.dashboard.lock().await;
        match result {
            Ok(events) => {
                tracing::debug!(
                    source = self.source.name(),
                    latency_ms = latency.as_millis() as u64,
                    events = events.len(),
                    "Timeline updated"
                );
                dashboard.apply_timeline(&events);
                drop(dashboard);
                self.notify(RefreshEvent::TimelineUpdated);
                true
            }
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    error = %e,
                    kind = e.kind(),
                    "Error fetching timeline"
                );
                dashboard.timeline_failed(&e);
                drop(dashboard);
                self.notify(RefreshEvent::TimelineFailed);
                false
            }
        }
    }

    /// One synthesis tick. Returns true if an alert was added.
    pub async fn synthesize_alert(&self) -> bool {
        let entry = self.synthesizer.next_now();
        let mut dashboard = self.dashboard.lock().await;
        let text = entry.text.clone();
        if !dashboard.push_local_alert(entry) {
            return false;
        }
        drop(dashboard);

        tracing::debug!(text = %text, "Synthesized alert");
        metrics::counter!("tcc_alerts_synthesized_total").increment(1);
        self.notify(RefreshEvent::AlertSynthesized);
        true
    }

    /// Register the timers and start polling.
    ///
    /// Dropping the returned scheduler does not stop the timers; cancel
    /// `cancel_token` or call [`Scheduler::shutdown`].
    pub fn start(self, cancel_token: CancellationToken) -> Scheduler {
        let this = Arc::new(self);
        let mut scheduler = Scheduler::new(cancel_token);
        let overlap = this.config.overlap;

        let metrics_loop = Arc::clone(&this);
        scheduler.every(
            METRICS_TIMER,
            this.config.metrics_period(),
            overlap,
            true,
            move || {
                let refresh = Arc::clone(&metrics_loop);
                async move {
                    refresh.poll_metrics().await;
                }
            },
        );

        let timeline_loop = Arc::clone(&this);
        scheduler.every(
            TIMELINE_TIMER,
            this.config.timeline_period(),
            overlap,
            true,
            move || {
                let refresh = Arc::clone(&timeline_loop);
                async move {
                    refresh.poll_timeline().await;
                }
            },
        );

        if this.config.synthesize_alerts {
            let alert_loop = Arc::clone(&this);
            scheduler.every(
                ALERTS_TIMER,
                this.config.alert_period(),
                overlap,
                false,
                move || {
                    let refresh = Arc::clone(&alert_loop);
                    async move {
                        refresh.synthesize_alert().await;
                    }
                },
            );
        }

        tracing::info!(
            source = this.source.name(),
            metrics_interval_ms = this.config.metrics_interval_ms,
            timeline_interval_ms = this.config.timeline_interval_ms,
            alert_interval_ms = this.config.alert_interval_ms,
            synthesize_alerts = this.config.synthesize_alerts,
            alert_policy = ?this.config.alert_policy,
            "Refresh loop started"
        );

        scheduler
    }

    fn notify(&self, event: RefreshEvent) {
        if let Some(sender) = &self.events {
            // No receivers is fine
            let _ = sender.send(event);
        }
    }
}

fn record_poll(endpoint: &'static str, latency_seconds: f64, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!("tcc_poll_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("tcc_poll_latency_seconds", "endpoint" => endpoint)
        .record(latency_seconds);
}
