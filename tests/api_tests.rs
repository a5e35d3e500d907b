mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;

use common::{body_json, body_string, scripted_app};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_document() -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri("/api/documents/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"content":"Some document"}"#))
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_get_document_success_body() {
    let (app, _, _) = scripted_app(&[10, 200]);

    let response = app.oneshot(get("/api/documents/42")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        r#"{"Id":42,"Content":"Content of the 42 document."}"#
    );
}

#[tokio::test(start_paused = true)]
async fn test_get_document_negative_id_is_echoed() {
    let (app, _, _) = scripted_app(&[10, 321]);

    let response = app.oneshot(get("/api/documents/-7")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"Id": -7, "Content": "Content of the -7 document."})
    );
}

#[tokio::test(start_paused = true)]
async fn test_get_document_reserved_draws() {
    let cases = [
        (400, StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        (401, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        (404, StatusCode::NOT_FOUND, "NOT_FOUND"),
        (500, StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    ];

    for (draw, status, code) in cases {
        let (app, _, _) = scripted_app(&[10, draw]);

        let response = app.oneshot(get("/api/documents/1")).await.unwrap();

        assert_eq!(response.status(), status, "draw {draw}");
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], code);
    }
}

#[tokio::test(start_paused = true)]
async fn test_get_document_upsert_only_draws_succeed() {
    for draw in [100, 403, 409, 499] {
        let (app, _, _) = scripted_app(&[10, draw]);

        let response = app.oneshot(get("/api/documents/5")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "draw {draw}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_get_document_waits_before_responding() {
    let (app, _, _) = scripted_app(&[99, 200]);

    let start = tokio::time::Instant::now();
    let response = app.oneshot(get("/api/documents/3")).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(elapsed >= Duration::from_millis(99), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(100), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_get_document_non_integer_id_is_not_found() {
    for uri in ["/api/documents/abc", "/api/documents/2147483648", "/api/documents/1.5"] {
        let (app, _, random) = scripted_app(&[10, 200]);

        let response = app.oneshot(get(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        // Unroutable ids never reach the simulator.
        assert_eq!(random.remaining(), 2);
    }
}

#[tokio::test(start_paused = true)]
async fn test_upsert_document_success_returns_generated_id() {
    let (app, _, _) = scripted_app(&[250, 123, 1_234_567]);

    let start = tokio::time::Instant::now();
    let response = app.oneshot(put_document()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(start.elapsed() >= Duration::from_millis(250));
    assert_eq!(body_string(response).await, r#"{"Id":1234567}"#);
}

#[tokio::test(start_paused = true)]
async fn test_upsert_document_ignores_body() {
    let (app, _, _) = scripted_app(&[100, 200, 8]);

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/documents/")
        .body(Body::from("not json at all"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"Id": 8}));
}

#[tokio::test(start_paused = true)]
async fn test_upsert_document_reserved_draws() {
    let cases = [
        (400, StatusCode::BAD_REQUEST),
        (403, StatusCode::FORBIDDEN),
        (409, StatusCode::CONFLICT),
        (500, StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (draw, status) in cases {
        let (app, _, random) = scripted_app(&[100, draw, 77]);

        let response = app.oneshot(put_document()).await.unwrap();

        assert_eq!(response.status(), status, "draw {draw}");
        // No id is generated on the failure branch.
        assert_eq!(random.remaining(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_customer_header_tags_request_metrics() {
    let (app, state, _) = scripted_app(&[10, 200, 10, 200]);

    let request = Request::builder()
        .uri("/api/documents/42")
        .header("X-APP-CUSTOMER", "first")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/documents/43")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let metrics = body_string(response).await;

    assert!(metrics.contains("http_server_requests_total"));
    assert!(metrics.contains(r#"customer="first""#));
    assert!(metrics.contains(r#"route="/api/documents/:documentId""#));
    assert!(metrics.contains(r#"document_outcomes_total{operation="fetch",outcome="OK"} 2"#));
    assert!(metrics.contains("target_info"));

    // One series per customer value, the untagged request included.
    let document_series = metrics
        .lines()
        .filter(|line| line.starts_with("http_server_requests_total{"))
        .filter(|line| line.contains("/api/documents/:documentId"))
        .count();
    assert_eq!(document_series, 2);
    let tagged = state
        .metrics
        .http_requests_total
        .get_metric_with_label_values(&["GET", "/api/documents/:documentId", "200", "first"])
        .unwrap();
    assert_eq!(tagged.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_customer_header_does_not_change_response() {
    let (app, _, _) = scripted_app(&[10, 200]);

    let request = Request::builder()
        .uri("/api/documents/42")
        .header("X-APP-CUSTOMER", "second")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        r#"{"Id":42,"Content":"Content of the 42 document."}"#
    );
}

#[tokio::test(start_paused = true)]
async fn test_metrics_disabled_still_serves_documents() {
    let mut config = common::test_config();
    config.monitoring.metrics = false;
    let state = some_service::AppState::with_random(config, common::ScriptedRandom::new(&[10, 200]))
        .unwrap();
    let app = some_service::build_router(state.clone());

    let request = Request::builder()
        .uri("/api/documents/9")
        .header("X-APP-CUSTOMER", "first")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = state.metrics.gather_text().unwrap();
    assert!(!text.contains(r#"customer="first""#));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _, _) = scripted_app(&[]);

    let response = app.oneshot(get("/openapi/v1.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert_eq!(spec["info"]["title"], "some-service");
    assert!(spec["paths"]["/api/documents/{documentId}"]["get"].is_object());
    assert!(spec["paths"]["/api/documents/"]["put"].is_object());
}

#[tokio::test]
async fn test_health_reports_service_resource() {
    let (app, _, _) = scripted_app(&[]);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "some-service");
    assert_eq!(body["version"], "0.0.1");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _, _) = scripted_app(&[]);

    let response = app.oneshot(get("/api/users/1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_upsert_document_without_trailing_slash() {
    let (app, _, _) = scripted_app(&[100, 200, 5]);

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/documents")
        .body(Body::from(r#"{"content":"Some document"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"Id":5}"#);
}

#[tokio::test(start_paused = true)]
async fn test_get_document_with_trailing_slash() {
    let (app, _, _) = scripted_app(&[10, 200]);

    let response = app.oneshot(get("/api/documents/42/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        r#"{"Id":42,"Content":"Content of the 42 document."}"#
    );
}
