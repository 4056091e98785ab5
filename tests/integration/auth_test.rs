//! Integration tests for the authentication flow.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn login_success() {
    let app = TestApp::new().await;
    app.create_test_user("testuser", "password123", "employee", 1)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "testuser",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["access_token"].is_string());
    assert!(response.body["data"]["refresh_token"].is_string());
    assert_eq!(response.body["data"]["user"]["username"], "testuser");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn login_invalid_password() {
    let app = TestApp::new().await;
    app.create_test_user("testuser2", "password123", "employee", 1)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "testuser2",
                "password": "wrongpassword",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn login_nonexistent_user() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "nobody",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn me_authenticated() {
    let app = TestApp::new().await;
    app.create_test_user("meuser", "password123", "admin", 9)
        .await;
    let token = app.login("meuser", "password123").await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "meuser");
    assert_eq!(response.body["data"]["role"], "admin");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn me_unauthenticated() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn logout_returns_ok() {
    let app = TestApp::new().await;
    app.create_test_user("logoutuser", "password123", "employee", 1)
        .await;
    let token = app.login("logoutuser", "password123").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn refresh_token_issues_new_access_token() {
    let app = TestApp::new().await;
    app.create_test_user("refreshuser", "password123", "employee", 1)
        .await;

    let login_resp = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "refreshuser",
                "password": "password123",
            })),
            None,
        )
        .await;

    let refresh_token = login_resp.body["data"]["refresh_token"]
        .as_str()
        .expect("No refresh_token in login response");

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({
                "refresh_token": refresh_token,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["access_token"].is_string());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn access_token_rejected_as_refresh_token() {
    let app = TestApp::new().await;
    app.create_test_user("mixeduser", "password123", "employee", 1)
        .await;
    let access_token = app.login("mixeduser", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({
                "refresh_token": access_token,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
