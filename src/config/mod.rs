//! Configuration module for the Traffic Control Center dashboard
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TCC_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use tcc::config::TccConfig;
//!
//! let config = TccConfig::default();
//! assert_eq!(config.source.base_url, "http://127.0.0.1:8000");
//!
//! let toml = r#"
//! [refresh]
//! metrics_interval_ms = 1000
//! "#;
//! let config: TccConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.refresh.metrics_interval_ms, 1000);
//! ```

pub mod error;
pub mod logging;
pub mod refresh;
pub mod simulator;
pub mod source;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use refresh::{AlertPolicy, OverlapPolicy, RefreshConfig};
pub use simulator::SimulatorConfig;
pub use source::{SourceConfig, SourceMode};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the dashboard client and the demo simulator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TccConfig {
    /// Metrics/timeline data source
    pub source: SourceConfig,
    /// Polling cadence and alert handling
    pub refresh: RefreshConfig,
    /// Demo simulator server
    pub simulator: SimulatorConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TccConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("TCC_BASE_URL") {
            self.source.base_url = url;
        }
        if let Ok(mode) = std::env::var("TCC_SOURCE_MODE") {
            if let Ok(m) = mode.parse() {
                self.source.mode = m;
            }
        }

        if let Ok(level) = std::env::var("TCC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TCC_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(port) = std::env::var("TCC_SIM_PORT") {
            if let Ok(p) = port.parse() {
                self.simulator.port = p;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.source.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "source.base_url",
                format!("expected an http(s) URL, got '{}'", url),
            ));
        }
        if self.source.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "source.timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        let intervals = [
            ("refresh.metrics_interval_ms", self.refresh.metrics_interval_ms),
            ("refresh.timeline_interval_ms", self.refresh.timeline_interval_ms),
            ("refresh.alert_interval_ms", self.refresh.alert_interval_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::invalid(field, "interval must be non-zero"));
            }
        }
        if self.refresh.alert_capacity == 0 {
            return Err(ConfigError::invalid(
                "refresh.alert_capacity",
                "capacity must be at least 1",
            ));
        }

        if self.simulator.port == 0 {
            return Err(ConfigError::invalid(
                "simulator.port",
                "port must be non-zero",
            ));
        }
        if !self.simulator.horizon.is_finite() || self.simulator.horizon <= 0.0 {
            return Err(ConfigError::invalid(
                "simulator.horizon",
                "horizon must be positive",
            ));
        }

        Ok(())
    }
}
