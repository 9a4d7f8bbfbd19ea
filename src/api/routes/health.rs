//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (dataset loaded)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once a non-empty dataset is loaded.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.dataset().await.is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// GET /health
///
/// Full health status with component details. The geolocation service is
/// not probed; lookup failures degrade to placeholders anyway.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dataset = state.dataset().await;

    let status = if dataset.is_empty() { "degraded" } else { "healthy" };

    Json(HealthResponse {
        status: status.to_string(),
        dataset_records: dataset.len(),
        months: dataset.months().len(),
        active_sessions: state.sessions.len().await,
        geo_backend: state.geo.backend_name().to_string(),
        geo_cached: state.geo.len().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
