//! Refresh loop configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a timer does when it fires while its previous job is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Drop the tick
    #[default]
    Skip,
    /// Remember at most one pending tick and run it when the job finishes
    Queue,
}

/// Precedence between server-provided alerts and locally synthesized ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertPolicy {
    /// Local synthesis pauses while the latest metrics poll succeeded
    #[default]
    SuspendWhileLive,
    /// Both writers run; whichever fires last wins that render pass
    Interleave,
    /// Server alerts are ignored; only synthesized alerts are shown
    LocalOnly,
}

/// Refresh loop timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub metrics_interval_ms: u64,
    pub timeline_interval_ms: u64,
    pub alert_interval_ms: u64,
    pub overlap: OverlapPolicy,
    pub alert_policy: AlertPolicy,
    pub synthesize_alerts: bool,
    /// Maximum alert log length
    pub alert_capacity: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            metrics_interval_ms: 3000,
            timeline_interval_ms: 3000,
            alert_interval_ms: 10_000,
            overlap: OverlapPolicy::Skip,
            alert_policy: AlertPolicy::SuspendWhileLive,
            synthesize_alerts: true,
            alert_capacity: 5,
        }
    }
}

impl RefreshConfig {
    pub fn metrics_period(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    pub fn timeline_period(&self) -> Duration {
        Duration::from_millis(self.timeline_interval_ms)
    }

    pub fn alert_period(&self) -> Duration {
        Duration::from_millis(self.alert_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_config_defaults() {
        let config = RefreshConfig::default();
        assert_eq!(config.metrics_period(), Duration::from_secs(3));
        assert_eq!(config.timeline_period(), Duration::from_secs(3));
        assert_eq!(config.alert_period(), Duration::from_secs(10));
        assert_eq!(config.overlap, OverlapPolicy::Skip);
        assert_eq!(config.alert_policy, AlertPolicy::SuspendWhileLive);
        assert_eq!(config.alert_capacity, 5);
    }

    #[test]
    fn test_policies_parse_snake_case() {
        let toml = r#"
        overlap = "queue"
        alert_policy = "local_only"
        "#;
        let config: RefreshConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.overlap, OverlapPolicy::Queue);
        assert_eq!(config.alert_policy, AlertPolicy::LocalOnly);
        assert_eq!(config.metrics_interval_ms, 3000);
    }
}
