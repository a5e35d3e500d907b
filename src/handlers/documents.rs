use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use tracing::debug;

use crate::{
    errors::{AppError, AppResult, ErrorResponse},
    models::{Document, DocumentPayload, UpsertedDocument},
    simulation::Operation,
    AppState,
};

/// Fetch a document by id
///
/// Waits a random 10-100ms, then either echoes the id with synthesized
/// content or fails with one of four randomly selected statuses.
#[utoipa::path(
    get,
    path = "/api/documents/{documentId}",
    params(("documentId" = i32, Path, description = "Document identifier")),
    responses(
        (status = 200, description = "Document found", body = Document),
        (status = 400, description = "Simulated bad request", body = ErrorResponse),
        (status = 401, description = "Simulated unauthorized", body = ErrorResponse),
        (status = 404, description = "Simulated or unroutable document", body = ErrorResponse),
        (status = 500, description = "Simulated server error", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn get_document(
    State(state): State<AppState>,
    document_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Document>> {
    // Ids outside the i32 range do not match the route.
    let Path(document_id) = document_id.map_err(|rejection| {
        debug!("Rejected document id: {}", rejection);
        AppError::NotFound
    })?;

    let result = state.simulator.fetch(document_id).await;
    record_outcome(&state, Operation::Fetch, &result);

    result.map(Json)
}

/// Create or update a document
///
/// The request body is accepted as-is and never read. Waits a random
/// 100-500ms, then either returns a fresh random id or fails with one of
/// four randomly selected statuses.
#[utoipa::path(
    put,
    path = "/api/documents/",
    request_body = DocumentPayload,
    responses(
        (status = 200, description = "Document accepted", body = UpsertedDocument),
        (status = 400, description = "Simulated bad request", body = ErrorResponse),
        (status = 403, description = "Simulated forbidden", body = ErrorResponse),
        (status = 409, description = "Simulated conflict", body = ErrorResponse),
        (status = 500, description = "Simulated server error", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn upsert_document(State(state): State<AppState>) -> AppResult<Json<UpsertedDocument>> {
    let result = state.simulator.upsert().await;
    record_outcome(&state, Operation::Upsert, &result);

    result.map(Json)
}

fn record_outcome<T>(state: &AppState, operation: Operation, result: &AppResult<T>) {
    if !state.config.monitoring.metrics {
        return;
    }

    let outcome = match result {
        Ok(_) => "OK",
        Err(error) => error.code(),
    };
    state.metrics.record_outcome(operation.as_str(), outcome);
}
