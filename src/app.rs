use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, put},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    handlers, middleware,
    openapi::{ApiDoc, OPENAPI_PATH},
    AppState,
};

/// Prefix of every document route
pub const DOCUMENTS_PREFIX: &str = "/api/documents";

/// Fixed system routes the metrics path must not shadow
pub const SYSTEM_PATHS: [&str; 3] = ["/health", "/live", OPENAPI_PATH];

/// Build the application router.
///
/// Request pipeline, outermost first: trace layer, request log, metrics
/// (installs the per-request tag set), customer tagging, handler.
pub fn build_router(state: AppState) -> Router {
    // Both trailing-slash forms are served.
    let document_routes = Router::new()
        .route("/api/documents/:documentId", get(handlers::get_document))
        .route("/api/documents/:documentId/", get(handlers::get_document))
        .route("/api/documents/", put(handlers::upsert_document))
        .route(DOCUMENTS_PREFIX, put(handlers::upsert_document));

    let system_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check))
        .route(
            &state.config.monitoring.metrics_path,
            get(handlers::metrics_handler),
        )
        .route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }));

    Router::new()
        .merge(document_routes)
        .merge(system_routes)
        .layer(from_fn(middleware::customer_tag_middleware))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::metrics_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_logging_middleware,
        ))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
