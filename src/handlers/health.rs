use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let telemetry = &state.config.telemetry;

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": telemetry.service_name,
        "version": telemetry.service_version,
        "environment": telemetry.environment,
        "metrics": state.config.monitoring.metrics
    }))
}

// Liveness check handler (for Kubernetes liveness probes)
pub async fn liveness_check() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
