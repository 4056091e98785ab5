//! Integration tests for attendance views and reclassification.

use chrono::{Datelike, Utc};
use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn user_sets_own_attendance() {
    let app = TestApp::new().await;
    app.create_test_user("att_user1", "password123", "employee", 1)
        .await;
    let token = app.login("att_user1", "password123").await;

    let today = Utc::now().date_naive();
    let response = app
        .request(
            "PUT",
            &format!("/api/attendance/{}", today),
            Some(json!({ "kind": "office" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["kind"], "office");
    assert_eq!(response.body["data"]["work_date"], today.to_string());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn set_attendance_overwrites_existing_record() {
    let app = TestApp::new().await;
    app.create_test_user("att_user2", "password123", "employee", 1)
        .await;
    let token = app.login("att_user2", "password123").await;
    let today = Utc::now().date_naive();

    app.request(
        "PUT",
        &format!("/api/attendance/{}", today),
        Some(json!({ "kind": "office" })),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "PUT",
            &format!("/api/attendance/{}", today),
            Some(json!({ "kind": "absence", "note": "sick leave" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["kind"], "absence");
    assert_eq!(response.body["data"]["note"], "sick leave");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn month_view_returns_records() {
    let app = TestApp::new().await;
    app.create_test_user("att_user3", "password123", "employee", 1)
        .await;
    let token = app.login("att_user3", "password123").await;
    let today = Utc::now().date_naive();

    app.request(
        "PUT",
        &format!("/api/attendance/{}", today),
        Some(json!({ "kind": "telework" })),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "GET",
            &format!("/api/attendance?year={}&month={}", today.year(), today.month()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let records = response.body["data"].as_array().expect("array of records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["kind"], "telework");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn day_view_returns_null_when_absent() {
    let app = TestApp::new().await;
    app.create_test_user("att_user4", "password123", "employee", 1)
        .await;
    let token = app.login("att_user4", "password123").await;
    let today = Utc::now().date_naive();

    let response = app
        .request(
            "GET",
            &format!("/api/attendance/{}", today),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].is_null());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn employee_cannot_set_another_users_record() {
    let app = TestApp::new().await;
    let other_id = app
        .create_test_user("att_other", "password123", "employee", 1)
        .await;
    app.create_test_user("att_user5", "password123", "employee", 1)
        .await;
    let token = app.login("att_user5", "password123").await;
    let today = Utc::now().date_naive();

    let response = app
        .request(
            "PUT",
            &format!("/api/attendance/{}", today),
            Some(json!({ "user_id": other_id, "kind": "holiday" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn manager_sets_record_for_team_member() {
    let app = TestApp::new().await;
    let member_id = app
        .create_test_user("att_member", "password123", "employee", 1)
        .await;
    app.create_test_user("att_manager", "password123", "manager", 5)
        .await;
    let token = app.login("att_manager", "password123").await;
    let today = Utc::now().date_naive();

    let response = app
        .request(
            "PUT",
            &format!("/api/attendance/{}", today),
            Some(json!({ "user_id": member_id, "kind": "holiday" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], member_id.to_string());
    assert_eq!(response.body["data"]["kind"], "holiday");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn team_today_requires_manager() {
    let app = TestApp::new().await;
    app.create_test_user("att_user6", "password123", "employee", 1)
        .await;
    let token = app.login("att_user6", "password123").await;

    let response = app
        .request("GET", "/api/attendance/team/today", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn team_today_lists_all_active_users() {
    let app = TestApp::new().await;
    app.create_test_user("att_user7", "password123", "employee", 1)
        .await;
    app.create_test_user("att_manager2", "password123", "manager", 5)
        .await;
    let manager_token = app.login("att_manager2", "password123").await;
    let worker_token = app.login("att_user7", "password123").await;

    // A telework check-in records today's attendance as telework.
    app.request(
        "POST",
        "/api/telework/check-in",
        Some(json!({})),
        Some(&worker_token),
    )
    .await;

    let response = app
        .request("GET", "/api/attendance/team/today", None, Some(&manager_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let entries = response.body["data"].as_array().expect("array of entries");
    assert_eq!(entries.len(), 2);

    let worker_entry = entries
        .iter()
        .find(|e| e["user"]["username"] == "att_user7")
        .expect("worker entry present");
    assert_eq!(worker_entry["record"]["kind"], "telework");
}
