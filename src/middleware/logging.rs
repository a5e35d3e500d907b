use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::customer::customer_from_headers;
use crate::{
    observability::{log_request, RequestContext},
    AppState,
};

/// Emit one structured log line per completed request
pub async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();

    let client_ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let request_context = RequestContext::new(
        uuid::Uuid::new_v4().to_string(),
        client_ip,
        request.method().to_string(),
        request.uri().path().to_string(),
    )
    .with_user_agent(user_agent)
    .with_customer(customer_from_headers(headers));

    let response = next.run(request).await;

    log_request(
        &request_context,
        &state.config.telemetry,
        response.status().as_u16(),
    );

    response
}
