//! Integration tests for the demo simulator router.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use tcc::feed::{DataSource, HttpSource, MetricsSnapshot, TimelineResponse};
use tcc::sim::{create_router, SimState, DEFAULT_HORIZON, FIXED_ALERTS};
use tower::Service;

fn app(seed: u64) -> axum::Router {
    create_router(Arc::new(SimState::new(Some(seed), DEFAULT_HORIZON)))
}

async fn get(app: &mut axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_metrics_endpoint_shape() {
    let mut app = app(42);
    let (status, body) = get(&mut app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let metrics: MetricsSnapshot = serde_json::from_slice(&body).unwrap();
    assert_eq!(metrics.active_trains, 3);
    assert_eq!(metrics.alerts, FIXED_ALERTS.to_vec());
    assert!((70.0..=95.0).contains(&metrics.efficiency));
}

#[tokio::test]
async fn test_timeline_endpoint_shape() {
    let mut app = app(42);
    let (status, body) = get(&mut app, "/timeline").await;
    assert_eq!(status, StatusCode::OK);

    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let events = value["timeline"].as_array().unwrap();
    assert_eq!(events.len(), 9);
    for event in events {
        for key in ["train", "start", "end", "block"] {
            assert!(event.get(key).is_some(), "missing {} in {}", key, event);
        }
    }

    let parsed: TimelineResponse = serde_json::from_slice(&body).unwrap();
    assert!(parsed.timeline.iter().all(|e| e.start < e.end));
}

#[tokio::test]
async fn test_same_seed_same_first_timeline() {
    let (_, a) = get(&mut app(5), "/timeline").await;
    let (_, b) = get(&mut app(5), "/timeline").await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_healthz_and_unknown_route() {
    let mut app = app(1);
    let (status, body) = get(&mut app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, _) = get(&mut app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let mut app = app(1);
    let request = Request::builder()
        .uri("/metrics")
        .header("Origin", "http://dashboard.example")
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_http_source_polls_live_simulator() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app(3)).await.unwrap();
    });

    let config = tcc::config::SourceConfig {
        base_url: format!("http://{}", addr),
        ..Default::default()
    };
    let source = HttpSource::new(&config).unwrap();
    let metrics = source.fetch_metrics().await.unwrap();
    let timeline = source.fetch_timeline().await.unwrap();

    assert_eq!(metrics.alerts.len(), 2);
    assert_eq!(timeline.len(), 9);
    server.abort();
}
