//! Integration tests for the WebSocket feed endpoint.

use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

use crate::helpers::TestApp;

/// Build a WebSocket upgrade request for the given path.
fn upgrade_request(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header("Host", "localhost")
        .header("Connection", "upgrade")
        .header("Upgrade", "websocket")
        .header("Sec-WebSocket-Version", "13")
        .header("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ==")
        .body(Body::empty())
        .expect("Failed to build upgrade request")
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn upgrade_succeeds_with_valid_token() {
    let app = TestApp::new().await;
    app.create_test_user("ws_user1", "password123", "employee", 1)
        .await;
    let token = app.login("ws_user1", "password123").await;

    let response = app
        .router
        .clone()
        .oneshot(upgrade_request(&format!("/ws?token={}", token)))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn upgrade_rejected_with_invalid_token() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(upgrade_request("/ws?token=not-a-jwt"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn upgrade_rejected_without_token() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(upgrade_request("/ws"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn refresh_token_cannot_open_feed() {
    let app = TestApp::new().await;
    app.create_test_user("ws_user2", "password123", "employee", 1)
        .await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "ws_user2",
                "password": "password123",
            })),
            None,
        )
        .await;
    let refresh_token = login.body["data"]["refresh_token"]
        .as_str()
        .expect("No refresh_token in login response");

    let response = app
        .router
        .clone()
        .oneshot(upgrade_request(&format!("/ws?token={}", refresh_token)))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
