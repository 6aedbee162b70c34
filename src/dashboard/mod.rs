//! Dashboard controller
//!
//! [`Dashboard`] is the single owner of everything the screen shows: the
//! element surface, the bounded alert log and the live chart instance. The
//! refresh loop and the input handler both go through it; nothing else
//! mutates view state.

pub mod kpi;

use crate::alerts::{format_clock, AlertEntry, AlertLog};
use crate::config::{AlertPolicy, RefreshConfig};
use crate::feed::{FetchError, MetricsSnapshot, TimelineEvent};
use crate::timeline::{group_by_train, ChartSlot};
use crate::view::{ids, Dispatch, Surface, Trigger, ViewController, ViewError};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Shown in the alerts container when the log is empty
pub const NO_ALERTS_PLACEHOLDER: &str = "No active alerts";

/// Dashboard shared between the refresh tasks and the input loop
pub type SharedDashboard = Arc<Mutex<Dashboard>>;

/// Outcome of the most recent poll of one endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    /// Not polled yet
    Pending,
    Ok { at: DateTime<Local> },
    Failed { at: DateTime<Local>, error: String },
}

impl FeedStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FeedStatus::Ok { .. })
    }
}

/// Owns all view state.
pub struct Dashboard {
    surface: Surface,
    view: ViewController,
    alerts: AlertLog,
    chart: ChartSlot,
    alert_policy: AlertPolicy,
    /// Last successful snapshot came with server alerts
    server_alerts: bool,
    metrics_status: FeedStatus,
    timeline_status: FeedStatus,
}

impl Dashboard {
    /// Dashboard over the standard template with a text Gantt chart.
    pub fn new(config: &RefreshConfig) -> Self {
        Self::with_parts(Surface::control_center(), ChartSlot::gantt(), config)
    }

    pub fn with_parts(surface: Surface, chart: ChartSlot, config: &RefreshConfig) -> Self {
        let view = ViewController::new(&surface);
        let mut dashboard = Self {
            surface,
            view,
            alerts: AlertLog::new(config.alert_capacity),
            chart,
            alert_policy: config.alert_policy,
            server_alerts: false,
            metrics_status: FeedStatus::Pending,
            timeline_status: FeedStatus::Pending,
        };
        dashboard.sync_alert_fields();
        dashboard
    }

    pub fn shared(self) -> SharedDashboard {
        Arc::new(Mutex::new(self))
    }

    /// Show the default panel.
    pub fn init(&mut self) -> Result<(), ViewError> {
        tracing::info!("Traffic Control Center dashboard initialized");
        self.view.init(&mut self.surface)
    }

    // -- metrics ------------------------------------------------------------

    /// Write a fresh snapshot: every KPI is overwritten and, unless the
    /// policy ignores server alerts, the alert log is replaced wholesale.
    pub fn apply_metrics(&mut self, snapshot: &MetricsSnapshot) {
        self.write_metrics(snapshot, true);
    }

    /// Write the KPIs of a snapshot from a source without server alerts.
    /// The alert log is left to local synthesis under every policy.
    pub fn apply_kpis(&mut self, snapshot: &MetricsSnapshot) {
        self.write_metrics(snapshot, false);
    }

    fn write_metrics(&mut self, snapshot: &MetricsSnapshot, with_alerts: bool) {
        kpi::write_snapshot(&mut self.surface, snapshot);

        if with_alerts && self.alert_policy != AlertPolicy::LocalOnly {
            let stamp = format_clock(&Local::now());
            self.alerts.replace_all(
                snapshot
                    .alerts
                    .iter()
                    .map(|text| AlertEntry::from_feed(text.clone(), stamp.clone())),
            );
            self.sync_alert_fields();
        }

        self.server_alerts = with_alerts;
        self.metrics_status = FeedStatus::Ok { at: Local::now() };
    }

    /// Record a failed metrics poll. Displayed values are left untouched.
    pub fn metrics_failed(&mut self, error: &FetchError) {
        self.metrics_status = FeedStatus::Failed {
            at: Local::now(),
            error: error.to_string(),
        };
    }

    // -- timeline -----------------------------------------------------------

    /// Group events by train and rebuild the chart.
    pub fn apply_timeline(&mut self, events: &[TimelineEvent]) {
        let series = group_by_train(events);
        tracing::debug!(
            events = events.len(),
            trains = series.len(),
            "Rebuilding timeline chart"
        );
        self.chart.replace(series);
        self.timeline_status = FeedStatus::Ok { at: Local::now() };
    }

    pub fn timeline_failed(&mut self, error: &FetchError) {
        self.timeline_status = FeedStatus::Failed {
            at: Local::now(),
            error: error.to_string(),
        };
    }

    // -- alerts -------------------------------------------------------------

    /// Whether local synthesis may write under the current policy.
    pub fn accepts_local_alerts(&self) -> bool {
        match self.alert_policy {
            AlertPolicy::SuspendWhileLive => !(self.server_alerts && self.metrics_status.is_ok()),
            AlertPolicy::Interleave | AlertPolicy::LocalOnly => true,
        }
    }

    /// Prepend a synthesized alert if the policy allows it.
    ///
    /// Returns false when synthesis is suspended.
    pub fn push_local_alert(&mut self, entry: AlertEntry) -> bool {
        if !self.accepts_local_alerts() {
            tracing::trace!("Live metrics available, local alert suppressed");
            return false;
        }
        if let Some(evicted) = self.alerts.prepend(entry) {
            tracing::trace!(text = %evicted.text, "Evicted oldest alert");
        }
        self.sync_alert_fields();
        true
    }

    fn sync_alert_fields(&mut self) {
        let count = self.alerts.len();
        self.surface
            .set_text(ids::ACTIVE_ALERTS_COUNT, count.to_string());
        self.surface
            .set_text(ids::ALERTS_TITLE, format!("Active Alerts ({})", count));
    }

    /// Lines for the alerts container, newest first.
    pub fn alert_lines(&self) -> Vec<String> {
        if self.alerts.is_empty() {
            vec![NO_ALERTS_PLACEHOLDER.to_string()]
        } else {
            self.alerts.rendered()
        }
    }

    // -- input --------------------------------------------------------------

    /// Apply a bound input. Missing panels are logged and reported.
    pub fn handle(&mut self, trigger: Trigger, now: Instant) -> Result<Dispatch, ViewError> {
        self.view.dispatch(&mut self.surface, trigger, now)
    }

    /// Resolve typed text to a trigger.
    pub fn resolve_input(&self, input: &str) -> Option<Trigger> {
        self.view.resolve_input(&self.surface, input)
    }

    /// Clear an elapsed insights highlight.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.surface.expire_highlight(now)
    }

    // -- accessors ----------------------------------------------------------

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn chart(&self) -> &ChartSlot {
        &self.chart
    }

    pub fn metrics_status(&self) -> &FeedStatus {
        &self.metrics_status
    }

    pub fn timeline_status(&self) -> &FeedStatus {
        &self.timeline_status
    }

    pub fn alert_policy(&self) -> AlertPolicy {
        self.alert_policy
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("surface", &self.surface)
            .field("alerts", &self.alerts)
            .field("chart", &self.chart)
            .field("alert_policy", &self.alert_policy)
            .field("server_alerts", &self.server_alerts)
            .field("metrics_status", &self.metrics_status)
            .field("timeline_status", &self.timeline_status)
            .finish()
    }
}
