use utoipa::OpenApi;

use crate::{errors, handlers, models};

/// Path the OpenAPI document is served from
pub const OPENAPI_PATH: &str = "/openapi/v1.json";

// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::documents::get_document,
        handlers::documents::upsert_document,
        handlers::health::health_check,
        handlers::metrics::metrics_handler,
    ),
    components(
        schemas(
            models::document::Document,
            models::document::UpsertedDocument,
            models::document::DocumentPayload,
            errors::ErrorResponse,
            errors::ErrorDetail,
        )
    ),
    tags(
        (name = "documents", description = "Simulated document fetch and upsert"),
        (name = "health", description = "Service health"),
        (name = "system", description = "Metrics scraping")
    ),
    info(
        title = "some-service",
        version = "0.0.1",
        description = "Document endpoints with simulated latency and randomized outcomes"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    )
)]
pub struct ApiDoc;
