/// Router tests for health, CORS and unmatched routes

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;

#[tokio::test]
async fn test_health_reports_connected_database() {
    let ctx = TestContext::new();

    let (status, body) = ctx.call("GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_reports_degraded_when_database_is_down() {
    let ctx = TestContext::new();
    ctx.store.set_offline(true);

    let (status, body) = ctx.call("GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_permissive_cors_allows_any_origin() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/tasks")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = ctx.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new();

    let (status, _) = ctx.call("GET", "/projects").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
