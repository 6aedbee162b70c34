//! Shared test utilities for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use tcc::config::{RefreshConfig, SourceConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A `/metrics` body as the simulator would send it.
pub fn metrics_body(active_trains: u32, alerts: &[&str]) -> Value {
    json!({
        "active_trains": active_trains,
        "efficiency": 90,
        "avg_delay": 2,
        "on_time": 95,
        "avg_speed": 80,
        "alerts": alerts,
    })
}

/// A `/timeline` body with two trains sharing block 1.
pub fn timeline_body() -> Value {
    json!({
        "timeline": [
            {"train": "T1", "block": 1, "start": 0.0, "end": 2.35},
            {"train": "T2", "block": 1, "start": 2.35, "end": 6.1},
            {"train": "T1", "block": 2, "start": 2.35, "end": 5.02},
        ]
    })
}

/// Mount a JSON response for `GET {route}`.
pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a bare status for `GET {route}`.
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// HTTP source pointed at the mock server.
pub fn source_config(server: &MockServer) -> SourceConfig {
    SourceConfig {
        base_url: server.uri(),
        timeout_seconds: 2,
        ..SourceConfig::default()
    }
}

/// Fast cadence so timer tests finish quickly in real time.
pub fn fast_refresh() -> RefreshConfig {
    RefreshConfig {
        metrics_interval_ms: 100,
        timeline_interval_ms: 100,
        alert_interval_ms: 250,
        ..RefreshConfig::default()
    }
}
