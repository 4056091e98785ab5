//! Integration tests for task assignment and workflow.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn manager_assigns_task_to_lower_grade() {
    let app = TestApp::new().await;
    let assignee_id = app
        .create_test_user("assignee1", "password123", "employee", 1)
        .await;
    app.create_test_user("manager1", "password123", "manager", 5)
        .await;
    let token = app.login("manager1", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({
                "title": "Prepare quarterly report",
                "description": "Numbers for Q3",
                "assignee_id": assignee_id,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "todo");
    assert_eq!(response.body["data"]["title"], "Prepare quarterly report");
    assert_eq!(
        response.body["data"]["assignee_id"],
        assignee_id.to_string()
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn lower_grade_cannot_assign_upward() {
    let app = TestApp::new().await;
    let boss_id = app
        .create_test_user("boss1", "password123", "manager", 7)
        .await;
    app.create_test_user("junior1", "password123", "employee", 1)
        .await;
    let token = app.login("junior1", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({
                "title": "Do my work for me",
                "assignee_id": boss_id,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn empty_title_is_rejected() {
    let app = TestApp::new().await;
    let assignee_id = app
        .create_test_user("assignee2", "password123", "employee", 1)
        .await;
    app.create_test_user("manager2", "password123", "manager", 5)
        .await;
    let token = app.login("manager2", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "title": "   ", "assignee_id": assignee_id })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn assignee_moves_task_through_workflow() {
    let app = TestApp::new().await;
    let assignee_id = app
        .create_test_user("worker_t1", "password123", "employee", 1)
        .await;
    app.create_test_user("manager3", "password123", "manager", 5)
        .await;
    let manager_token = app.login("manager3", "password123").await;
    let worker_token = app.login("worker_t1", "password123").await;

    let created = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Review PR", "assignee_id": assignee_id })),
            Some(&manager_token),
        )
        .await;
    let task_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let in_progress = app
        .request(
            "PUT",
            &format!("/api/tasks/{}/status", task_id),
            Some(json!({ "status": "in_progress" })),
            Some(&worker_token),
        )
        .await;
    assert_eq!(in_progress.status, StatusCode::OK);
    assert_eq!(in_progress.body["data"]["status"], "in_progress");

    let done = app
        .request(
            "PUT",
            &format!("/api/tasks/{}/status", task_id),
            Some(json!({ "status": "done" })),
            Some(&worker_token),
        )
        .await;
    assert_eq!(done.status, StatusCode::OK);
    assert_eq!(done.body["data"]["status"], "done");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn bystander_cannot_move_task() {
    let app = TestApp::new().await;
    let assignee_id = app
        .create_test_user("worker_t2", "password123", "employee", 1)
        .await;
    app.create_test_user("bystander", "password123", "employee", 1)
        .await;
    app.create_test_user("manager4", "password123", "manager", 5)
        .await;
    let manager_token = app.login("manager4", "password123").await;
    let bystander_token = app.login("bystander", "password123").await;

    let created = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Write docs", "assignee_id": assignee_id })),
            Some(&manager_token),
        )
        .await;
    let task_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/tasks/{}/status", task_id),
            Some(json!({ "status": "done" })),
            Some(&bystander_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn list_assigned_filters_by_status() {
    let app = TestApp::new().await;
    let assignee_id = app
        .create_test_user("worker_t3", "password123", "employee", 1)
        .await;
    app.create_test_user("manager5", "password123", "manager", 5)
        .await;
    let manager_token = app.login("manager5", "password123").await;
    let worker_token = app.login("worker_t3", "password123").await;

    for title in ["First", "Second"] {
        app.request(
            "POST",
            "/api/tasks",
            Some(json!({ "title": title, "assignee_id": assignee_id })),
            Some(&manager_token),
        )
        .await;
    }

    let all = app
        .request("GET", "/api/tasks", None, Some(&worker_token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"]["total_items"], 2);

    let done = app
        .request("GET", "/api/tasks?status=done", None, Some(&worker_token))
        .await;
    assert_eq!(done.status, StatusCode::OK);
    assert_eq!(done.body["data"]["total_items"], 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn assigner_sees_created_tasks() {
    let app = TestApp::new().await;
    let assignee_id = app
        .create_test_user("worker_t4", "password123", "employee", 1)
        .await;
    app.create_test_user("manager6", "password123", "manager", 5)
        .await;
    let manager_token = app.login("manager6", "password123").await;

    app.request(
        "POST",
        "/api/tasks",
        Some(json!({ "title": "Inventory check", "assignee_id": assignee_id })),
        Some(&manager_token),
    )
    .await;

    let response = app
        .request("GET", "/api/tasks/created", None, Some(&manager_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);
    assert_eq!(response.body["data"]["items"][0]["title"], "Inventory check");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn reassign_applies_grade_rule_to_new_assignee() {
    let app = TestApp::new().await;
    let assignee_id = app
        .create_test_user("worker_t5", "password123", "employee", 1)
        .await;
    let peer_id = app
        .create_test_user("worker_t6", "password123", "employee", 2)
        .await;
    let boss_id = app
        .create_test_user("director", "password123", "manager", 9)
        .await;
    app.create_test_user("manager7", "password123", "manager", 5)
        .await;
    let manager_token = app.login("manager7", "password123").await;

    let created = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Triage bugs", "assignee_id": assignee_id })),
            Some(&manager_token),
        )
        .await;
    let task_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let ok = app
        .request(
            "PUT",
            &format!("/api/tasks/{}/reassign", task_id),
            Some(json!({ "assignee_id": peer_id })),
            Some(&manager_token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["data"]["assignee_id"], peer_id.to_string());

    let upward = app
        .request(
            "PUT",
            &format!("/api/tasks/{}/reassign", task_id),
            Some(json!({ "assignee_id": boss_id })),
            Some(&manager_token),
        )
        .await;
    assert_eq!(upward.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn assigner_deletes_task() {
    let app = TestApp::new().await;
    let assignee_id = app
        .create_test_user("worker_t7", "password123", "employee", 1)
        .await;
    app.create_test_user("manager8", "password123", "manager", 5)
        .await;
    let manager_token = app.login("manager8", "password123").await;

    let created = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Obsolete task", "assignee_id": assignee_id })),
            Some(&manager_token),
        )
        .await;
    let task_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "DELETE",
            &format!("/api/tasks/{}", task_id),
            None,
            Some(&manager_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["message"], "Task deleted");

    let gone = app
        .request(
            "GET",
            &format!("/api/tasks/{}", task_id),
            None,
            Some(&manager_token),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
