//! HTTP endpoints of the demo simulator.
//!
//! - `GET /metrics` - metrics payload from a fresh run
//! - `GET /timeline` - `{ "timeline": [...] }` from a fresh run
//! - `GET /healthz` - liveness probe

use super::SimState;
use crate::feed::{MetricsSnapshot, TimelineResponse};
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the simulator router.
pub fn create_router(state: Arc<SimState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/timeline", get(timeline_handler))
        .route("/healthz", get(healthz_handler))
        // Browsers on other origins may poll the simulator too
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<SimState>>) -> Json<MetricsSnapshot> {
    let snapshot = state.metrics();
    metrics::counter!("tcc_sim_requests_total", "endpoint" => "metrics").increment(1);
    tracing::debug!(
        active_trains = snapshot.active_trains,
        avg_delay = snapshot.avg_delay,
        "Served metrics"
    );
    Json(snapshot)
}

/// GET /timeline
pub async fn timeline_handler(State(state): State<Arc<SimState>>) -> Json<TimelineResponse> {
    let timeline = state.timeline();
    metrics::counter!("tcc_sim_requests_total", "endpoint" => "timeline").increment(1);
    tracing::debug!(events = timeline.len(), "Served timeline");
    Json(TimelineResponse { timeline })
}

pub async fn healthz_handler() -> &'static str {
    "ok"
}
