//! Data source configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where the dashboard gets its metrics and timeline from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Poll the `/metrics` and `/timeline` HTTP endpoints
    #[default]
    Http,
    /// Fabricate random KPIs locally (no network)
    Random,
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(SourceMode::Http),
            "random" => Ok(SourceMode::Random),
            _ => Err(format!("Invalid source mode: {}", s)),
        }
    }
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub mode: SourceMode,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            mode: SourceMode::Http,
            timeout_seconds: 5,
        }
    }
}

impl SourceConfig {
    /// Join an endpoint path onto the base URL, tolerating a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
