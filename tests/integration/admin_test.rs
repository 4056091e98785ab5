//! Integration tests for admin user management, session oversight, and reports.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn admin_creates_user_who_can_login() {
    let app = TestApp::new().await;
    app.create_test_user("admin1", "password123", "admin", 9)
        .await;
    let token = app.login("admin1", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/admin/users",
            Some(json!({
                "username": "newhire",
                "email": "newhire@example.com",
                "password": "initialpass123",
                "display_name": "New Hire",
                "role": "employee",
                "grade": 2,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "newhire");
    assert_eq!(response.body["data"]["role"], "employee");
    assert_eq!(response.body["data"]["grade"], 2);

    // The freshly created account is immediately usable.
    app.login("newhire", "initialpass123").await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn employee_cannot_create_users() {
    let app = TestApp::new().await;
    app.create_test_user("plain1", "password123", "employee", 1)
        .await;
    let token = app.login("plain1", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/admin/users",
            Some(json!({
                "username": "sneaky",
                "password": "password123",
                "role": "admin",
                "grade": 9,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn employee_cannot_list_users() {
    let app = TestApp::new().await;
    app.create_test_user("plain2", "password123", "employee", 1)
        .await;
    let token = app.login("plain2", "password123").await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn manager_lists_and_searches_users() {
    let app = TestApp::new().await;
    app.create_test_user("mgr1", "password123", "manager", 5)
        .await;
    app.create_test_user("alice", "password123", "employee", 1)
        .await;
    app.create_test_user("bob", "password123", "employee", 1)
        .await;
    let token = app.login("mgr1", "password123").await;

    let all = app
        .request("GET", "/api/admin/users", None, Some(&token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"]["total_items"], 3);

    let found = app
        .request("GET", "/api/admin/users?q=alice", None, Some(&token))
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["data"]["total_items"], 1);
    assert_eq!(found.body["data"]["items"][0]["username"], "alice");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn admin_changes_role() {
    let app = TestApp::new().await;
    app.create_test_user("admin2", "password123", "admin", 9)
        .await;
    let target_id = app
        .create_test_user("promotee", "password123", "employee", 3)
        .await;
    let token = app.login("admin2", "password123").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/users/{}/role", target_id),
            Some(json!({ "role": "manager" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["role"], "manager");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn deactivated_user_cannot_login() {
    let app = TestApp::new().await;
    app.create_test_user("admin3", "password123", "admin", 9)
        .await;
    let target_id = app
        .create_test_user("leaver", "password123", "employee", 1)
        .await;
    let token = app.login("admin3", "password123").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/users/{}/status", target_id),
            Some(json!({ "status": "inactive" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "inactive");

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "leaver", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn admin_lists_open_sessions() {
    let app = TestApp::new().await;
    app.create_test_user("admin4", "password123", "admin", 9)
        .await;
    app.create_test_user("remote1", "password123", "employee", 1)
        .await;
    let admin_token = app.login("admin4", "password123").await;
    let worker_token = app.login("remote1", "password123").await;

    app.request(
        "POST",
        "/api/telework/check-in",
        Some(json!({})),
        Some(&worker_token),
    )
    .await;

    let response = app
        .request("GET", "/api/admin/sessions", None, Some(&admin_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);
    assert_eq!(response.body["data"]["items"][0]["status"], "connected");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn force_checkout_closes_session() {
    let app = TestApp::new().await;
    app.create_test_user("admin5", "password123", "admin", 9)
        .await;
    app.create_test_user("remote2", "password123", "employee", 1)
        .await;
    let admin_token = app.login("admin5", "password123").await;
    let worker_token = app.login("remote2", "password123").await;

    let session = app
        .request(
            "POST",
            "/api/telework/check-in",
            Some(json!({})),
            Some(&worker_token),
        )
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            &format!("/api/admin/sessions/{}/force-checkout", session_id),
            Some(json!({ "reason": "left the laptop open overnight" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["forced_checkout"], true);
    assert!(response.body["data"]["check_out"].is_string());
    assert_eq!(response.body["data"]["status"], "offline");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn force_checkout_requires_manager() {
    let app = TestApp::new().await;
    app.create_test_user("remote3", "password123", "employee", 1)
        .await;
    let worker_token = app.login("remote3", "password123").await;

    let session = app
        .request(
            "POST",
            "/api/telework/check-in",
            Some(json!({})),
            Some(&worker_token),
        )
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            &format!("/api/admin/sessions/{}/force-checkout", session_id),
            Some(json!({})),
            Some(&worker_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn overview_report_counts_population() {
    let app = TestApp::new().await;
    app.create_test_user("mgr2", "password123", "manager", 5)
        .await;
    app.create_test_user("remote4", "password123", "employee", 1)
        .await;
    let manager_token = app.login("mgr2", "password123").await;
    let worker_token = app.login("remote4", "password123").await;

    app.request(
        "POST",
        "/api/telework/check-in",
        Some(json!({})),
        Some(&worker_token),
    )
    .await;

    let response = app
        .request("GET", "/api/admin/reports/overview", None, Some(&manager_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_users"], 2);
    assert_eq!(response.body["data"]["active_users"], 2);
    assert_eq!(response.body["data"]["open_sessions"], 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn weekly_report_covers_seven_days() {
    let app = TestApp::new().await;
    app.create_test_user("mgr3", "password123", "manager", 5)
        .await;
    let worker_id = app
        .create_test_user("remote5", "password123", "employee", 1)
        .await;
    let manager_token = app.login("mgr3", "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/admin/reports/weekly/{}", worker_id),
            None,
            Some(&manager_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], worker_id.to_string());
    assert_eq!(response.body["data"]["days"].as_array().unwrap().len(), 7);
    assert_eq!(response.body["data"]["total_seconds"], 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn employee_cannot_read_another_users_weekly_report() {
    let app = TestApp::new().await;
    let other_id = app
        .create_test_user("remote6", "password123", "employee", 1)
        .await;
    app.create_test_user("curious", "password123", "employee", 1)
        .await;
    let token = app.login("curious", "password123").await;

    let response = app
        .request(
            "GET",
            &format!("/api/admin/reports/weekly/{}", other_id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
