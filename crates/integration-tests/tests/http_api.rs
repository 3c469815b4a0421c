//! Integration tests for the HTTP surface.
//!
//! The full router, middleware included, is driven in-process with
//! `tower::ServiceExt::oneshot`; the upstream is an in-process stub.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use order_counter_integration_tests::{Behavior, StubUpstream, TEST_TOKEN, test_config};
use order_counter_server::config::CounterConfig;
use order_counter_server::middleware::REQUEST_ID_HEADER;
use order_counter_server::routes::build_router;
use order_counter_server::state::AppState;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

fn app(config: CounterConfig) -> Router {
    build_router(AppState::new(config).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// =============================================================================
// Order Count API
// =============================================================================

#[tokio::test]
async fn test_count_defaults_to_all_time() {
    let stub = StubUpstream::spawn(Behavior::Orders(12)).await;
    let (status, json) = get_json(app(test_config(&stub.base_url())), "/api/orders/count").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 12);
    assert_eq!(json["period"], "all-time");
    assert!(json["timestamp"].is_string());
    assert_eq!(stub.last_query().as_deref(), Some("status=any"));
}

#[tokio::test]
async fn test_count_for_period() {
    let stub = StubUpstream::spawn(Behavior::Count(31)).await;
    let (status, json) = get_json(
        app(test_config(&stub.base_url())),
        "/api/orders/count?period=this-week",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 31);
    assert_eq!(json["period"], "this-week");
    let query = stub.last_query().unwrap();
    assert!(query.contains("created_at_min="));
    assert!(query.contains("created_at_max="));
}

#[tokio::test]
async fn test_invalid_period_never_reaches_upstream() {
    let stub = StubUpstream::spawn(Behavior::Count(1)).await;
    let (status, json) = get_json(
        app(test_config(&stub.base_url())),
        "/api/orders/count?period=fortnight",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid period parameter");
    let allowed: Vec<&str> = json["allowed_periods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(allowed.len(), 9);
    assert!(allowed.contains(&"today"));
    assert!(allowed.contains(&"all-time"));
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_period_match_is_exact() {
    let stub = StubUpstream::spawn(Behavior::Count(1)).await;
    let (status, _) = get_json(
        app(test_config(&stub.base_url())),
        "/api/orders/count?period=Today",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreadable_query_is_json_bad_request() {
    let stub = StubUpstream::spawn(Behavior::Count(1)).await;
    let (status, json) = get_json(
        app(test_config(&stub.base_url())),
        "/api/orders/count?period=today&period=yesterday",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid period parameter");
    assert_eq!(json["allowed_periods"].as_array().unwrap().len(), 9);
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_incomplete_config_is_service_unavailable() {
    let stub = StubUpstream::spawn(Behavior::Count(1)).await;
    let mut config = test_config(&stub.base_url());
    config.shopify.access_token = SecretString::from("");

    let (status, json) = get_json(app(config), "/api/orders/count?period=today").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["success"], false);
    assert_eq!(json["period"], "today");
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_upstream_rejection_is_bad_gateway() {
    let stub = StubUpstream::spawn(Behavior::Status(StatusCode::UNAUTHORIZED)).await;
    let (status, headers, body) = get(
        app(test_config(&stub.base_url())),
        "/api/orders/count?period=today",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!String::from_utf8_lossy(&body).contains(TEST_TOKEN));
    assert!(
        headers
            .get_all(header::CONTENT_TYPE)
            .iter()
            .any(|v| v.to_str().unwrap().starts_with("application/json"))
    );

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["period"], "today");
    assert!(json["count"].is_null());
    assert!(json["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_upstream_timeout_is_gateway_timeout() {
    let stub = StubUpstream::spawn(Behavior::Hang).await;
    let mut config = test_config(&stub.base_url());
    config.shopify.request_timeout = std::time::Duration::from_secs(1);

    let (status, json) = get_json(app(config), "/api/orders/count").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["success"], false);
}

// =============================================================================
// Probes
// =============================================================================

#[tokio::test]
async fn test_health_reports_valid_config() {
    let stub = StubUpstream::spawn(Behavior::Count(1)).await;
    let (status, json) = get_json(app(test_config(&stub.base_url())), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["config"], "valid");
    assert!(json["version"].is_string());
    // Liveness never calls upstream
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_health_reports_incomplete_config() {
    let mut config = test_config("test.myshopify.com");
    config.shopify.access_token = SecretString::from("");

    let (status, json) = get_json(app(config), "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["config"], "invalid");
}

#[tokio::test]
async fn test_config_check_passes() {
    let (status, json) = get_json(app(test_config("test.myshopify.com")), "/config/check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["config"]["shopify_store_url"], "set");
    assert_eq!(json["config"]["shopify_access_token"], "set");
    assert!(json.get("help").is_none());

    // Values are never echoed
    assert!(!json.to_string().contains(TEST_TOKEN));
    assert!(!json.to_string().contains("test.myshopify.com"));
}

#[tokio::test]
async fn test_config_check_lists_missing() {
    let mut config = test_config("test.myshopify.com");
    config.shopify.access_token = SecretString::from("");

    let (status, json) = get_json(app(config), "/config/check").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["config"]["shopify_access_token"], "missing");
    assert_eq!(json["config"]["shopify_store_url"], "set");
    assert_eq!(
        json["help"]["required_variables"],
        serde_json::json!(["SHOPIFY_STORE_URL", "SHOPIFY_ACCESS_TOKEN"])
    );
}

// =============================================================================
// Page, Fallback and Middleware
// =============================================================================

#[tokio::test]
async fn test_display_page_renders() {
    let (status, headers, body) = get(app(test_config("test.myshopify.com")), "/").await;
    let html = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert!(html.contains("<title>Order Counter</title>"));
    assert!(html.contains(r#"data-period="last-month""#));
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let (status, _, body) = get(app(test_config("test.myshopify.com")), "/static/js/counter.js").await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("/api/orders/count"));
}

#[tokio::test]
async fn test_unknown_path_is_json_not_found() {
    let (status, json) = get_json(app(test_config("test.myshopify.com")), "/api/orders/total").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Endpoint not found");
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let (_, headers, _) = get(app(test_config("test.myshopify.com")), "/health").await;

    assert!(headers.contains_key(REQUEST_ID_HEADER));
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
}

#[tokio::test]
async fn test_incoming_request_id_is_echoed() {
    let response = app(test_config("test.myshopify.com"))
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "edge-7f3c")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "edge-7f3c");
}
