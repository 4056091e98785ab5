//! Integration tests for the telework session lifecycle.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn check_in_opens_session() {
    let app = TestApp::new().await;
    app.create_test_user("worker1", "password123", "employee", 1)
        .await;
    let token = app.login("worker1", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/telework/check-in",
            Some(serde_json::json!({ "note": "starting the day" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "connected");
    assert_eq!(response.body["active_seconds"], 0);
    assert!(response.body["check_out"].is_null());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn second_check_in_same_day_conflicts() {
    let app = TestApp::new().await;
    app.create_test_user("worker2", "password123", "employee", 1)
        .await;
    let token = app.login("worker2", "password123").await;

    let first = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn heartbeat_deltas_accumulate() {
    let app = TestApp::new().await;
    app.create_test_user("worker3", "password123", "employee", 1)
        .await;
    let token = app.login("worker3", "password123").await;

    let session = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();

    let first = app
        .request(
            "POST",
            "/api/telework/heartbeat",
            Some(serde_json::json!({ "session_id": session_id, "delta_seconds": 5 })),
            Some(&token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["active_seconds"], 5);

    let second = app
        .request(
            "POST",
            "/api/telework/heartbeat",
            Some(serde_json::json!({ "session_id": session_id, "delta_seconds": 7 })),
            Some(&token),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["active_seconds"], 12);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn negative_heartbeat_delta_is_rejected() {
    let app = TestApp::new().await;
    app.create_test_user("worker4", "password123", "employee", 1)
        .await;
    let token = app.login("worker4", "password123").await;

    let session = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/telework/heartbeat",
            Some(serde_json::json!({ "session_id": session_id, "delta_seconds": -5 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn heartbeat_can_change_presence_status() {
    let app = TestApp::new().await;
    app.create_test_user("worker5", "password123", "employee", 1)
        .await;
    let token = app.login("worker5", "password123").await;

    let session = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/telework/heartbeat",
            Some(serde_json::json!({
                "session_id": session_id,
                "delta_seconds": 30,
                "status": "in_meeting",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "in_meeting");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn heartbeat_cannot_set_offline() {
    let app = TestApp::new().await;
    app.create_test_user("worker6", "password123", "employee", 1)
        .await;
    let token = app.login("worker6", "password123").await;

    let session = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/telework/heartbeat",
            Some(serde_json::json!({
                "session_id": session_id,
                "delta_seconds": 10,
                "status": "offline",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn check_out_closes_session() {
    let app = TestApp::new().await;
    app.create_test_user("worker7", "password123", "employee", 1)
        .await;
    let token = app.login("worker7", "password123").await;

    let session = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/telework/check-out",
            Some(serde_json::json!({ "session_id": session_id })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["check_out"].is_string());
    assert_eq!(response.body["status"], "offline");

    // Closed sessions cannot be checked out again.
    let again = app
        .request(
            "POST",
            "/api/telework/check-out",
            Some(serde_json::json!({ "session_id": session_id })),
            Some(&token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn heartbeat_against_closed_session_conflicts() {
    let app = TestApp::new().await;
    app.create_test_user("worker10", "password123", "employee", 1)
        .await;
    let token = app.login("worker10", "password123").await;

    let session = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();
    app.request(
        "POST",
        "/api/telework/check-out",
        Some(serde_json::json!({ "session_id": session_id })),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/telework/heartbeat",
            Some(serde_json::json!({ "session_id": session_id, "delta_seconds": 10 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn today_reflects_open_session() {
    let app = TestApp::new().await;
    app.create_test_user("worker8", "password123", "employee", 1)
        .await;
    let token = app.login("worker8", "password123").await;

    let empty = app
        .request("GET", "/api/telework/today", None, Some(&token))
        .await;
    assert_eq!(empty.status, StatusCode::OK);
    assert!(empty.body.is_null());

    app.request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;

    let open = app
        .request("GET", "/api/telework/today", None, Some(&token))
        .await;
    assert_eq!(open.status, StatusCode::OK);
    assert_eq!(open.body["status"], "connected");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn users_cannot_touch_other_users_sessions() {
    let app = TestApp::new().await;
    app.create_test_user("owner", "password123", "employee", 1)
        .await;
    app.create_test_user("intruder", "password123", "employee", 1)
        .await;
    let owner_token = app.login("owner", "password123").await;
    let intruder_token = app.login("intruder", "password123").await;

    let session = app
        .request(
            "POST",
            "/api/telework/check-in",
            Some(serde_json::json!({})),
            Some(&owner_token),
        )
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/telework/heartbeat",
            Some(serde_json::json!({ "session_id": session_id, "delta_seconds": 5 })),
            Some(&intruder_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn history_lists_closed_sessions() {
    let app = TestApp::new().await;
    app.create_test_user("worker9", "password123", "employee", 1)
        .await;
    let token = app.login("worker9", "password123").await;

    let session = app
        .request("POST", "/api/telework/check-in", Some(serde_json::json!({})), Some(&token))
        .await;
    let session_id = session.body["id"].as_str().unwrap().to_string();
    app.request(
        "POST",
        "/api/telework/check-out",
        Some(serde_json::json!({ "session_id": session_id })),
        Some(&token),
    )
    .await;

    let response = app
        .request("GET", "/api/telework/sessions", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_items"], 1);
    assert_eq!(response.body["items"][0]["id"], session_id);
}
