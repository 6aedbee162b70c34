//! Demo simulator server configuration

use serde::{Deserialize, Serialize};

/// Simulator server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub host: String,
    pub port: u16,
    /// Fixed RNG seed for reproducible runs; random when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Simulated minutes per run
    pub horizon: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            seed: None,
            horizon: 50.0,
        }
    }
}
