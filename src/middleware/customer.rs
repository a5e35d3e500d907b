use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

use crate::metrics::{MetricTags, CUSTOMER_TAG};

/// Header naming the tenant a request is made on behalf of
pub const CUSTOMER_HEADER: &str = "x-app-customer";

/// First value of the customer header, if any
pub fn customer_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CUSTOMER_HEADER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Tag request metrics with the calling customer.
///
/// Must run inside [`super::metrics_middleware`]; without a tag set in the
/// request extensions there is nothing to tag and the request passes through.
pub async fn customer_tag_middleware(request: Request, next: Next) -> Response {
    if let Some(tags) = request.extensions().get::<MetricTags>() {
        if let Some(customer) = customer_from_headers(request.headers()) {
            tags.insert(CUSTOMER_TAG, customer);
        }
    }

    next.run(request).await
}
