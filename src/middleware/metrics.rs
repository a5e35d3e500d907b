use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::debug;

use crate::{metrics::MetricTags, AppState};

/// Middleware to collect HTTP request metrics
///
/// Records request count and duration by method, route, status code and any
/// extra dimensions inner middleware add to the request's [`MetricTags`].
/// The tag set is only installed while metrics are enabled, so inner
/// middleware can tell whether anyone is listening.
pub async fn metrics_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Skip metrics collection if disabled
    if !state.config.monitoring.metrics {
        return next.run(request).await;
    }

    let start_time = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| normalize_endpoint_path(request.uri().path()));

    let tags = MetricTags::default();
    request.extensions_mut().insert(tags.clone());

    let response = {
        let _active = state.metrics.track_active(&method, &route);
        next.run(request).await
    };

    let duration = start_time.elapsed();
    let status = response.status().as_u16();
    let tags = tags.snapshot();

    state
        .metrics
        .record_http_request(&method, &route, status, &tags, duration);

    debug!(
        "HTTP request metered: {} {} -> {} in {:.3}ms ({:?})",
        method,
        route,
        status,
        duration.as_secs_f64() * 1000.0,
        tags
    );

    response
}

/// Normalize endpoint paths for better metric grouping
///
/// Used for requests that matched no route. Dynamic path segments are
/// replaced with placeholders to avoid creating too many unique series.
pub fn normalize_endpoint_path(path: &str) -> String {
    match path {
        p if p.starts_with("/api/") => p
            .split('/')
            .map(|segment| {
                if is_uuid(segment) {
                    "{uuid}"
                } else if is_numeric_id(segment) {
                    "{id}"
                } else {
                    segment
                }
            })
            .collect::<Vec<_>>()
            .join("/"),

        // Default: return path as-is for other endpoints
        _ => path.to_string(),
    }
}

/// Check if a string looks like a UUID
fn is_uuid(s: &str) -> bool {
    // Basic UUID pattern check (8-4-4-4-12 hexadecimal digits)
    s.len() == 36
        && s.chars().enumerate().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

/// Check if a string looks like a numeric ID, signed or not
fn is_numeric_id(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.len() <= 20 && digits.chars().all(|c| c.is_ascii_digit())
}
