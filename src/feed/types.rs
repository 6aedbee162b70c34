//! Wire types for the metrics and timeline endpoints.

use serde::{Deserialize, Serialize};

/// One `/metrics` payload. Replaces the previous snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub active_trains: u32,
    /// Network efficiency, percent
    pub efficiency: f64,
    /// Average delay in minutes
    pub avg_delay: f64,
    /// On-time performance, percent
    pub on_time: f64,
    /// Average speed in km/h
    pub avg_speed: f64,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// A train occupying a track block between two simulation times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub train: String,
    pub start: f64,
    pub end: f64,
    pub block: u32,
}

/// Body of the `/timeline` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
}
