use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::{metrics::PROMETHEUS_CONTENT_TYPE, AppState};

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text format for scraping by monitoring systems.
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus text exposition", body = String, content_type = "text/plain"),
        (status = 500, description = "Metrics could not be encoded")
    ),
    tag = "system"
)]
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    debug!("Serving Prometheus metrics");

    match state.metrics.gather_text() {
        Ok(metrics_text) => {
            debug!(
                "Successfully generated metrics text ({} bytes)",
                metrics_text.len()
            );

            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
                metrics_text,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to generate metrics: {}", e);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                "Error generating metrics",
            )
                .into_response()
        }
    }
}
