//! Task handlers — creation, listing, workflow moves, reassignment.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use telehub_core::error::AppError;
use telehub_core::types::pagination::{PageRequest, PageResponse};
use telehub_entity::task::{CreateTask, Task, UpdateTask};

use crate::dto::request::{
    CreateTaskRequest, ReassignTaskRequest, TaskListQuery, UpdateTaskRequest,
    UpdateTaskStatusRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<ApiResponse<PageResponse<Task>>>, AppError> {
    let user_id = query.user_id.unwrap_or(auth.user_id);
    let page = PageRequest::new(query.page, query.per_page);

    let tasks = state
        .task_service
        .list_assigned(&auth, user_id, query.status, &page)
        .await?;
    Ok(Json(ApiResponse::ok(tasks)))
}

/// GET /api/tasks/created
pub async fn list_created(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Task>>>, AppError> {
    let page = params.into_page_request();
    let tasks = state.task_service.list_created(&auth, &page).await?;
    Ok(Json(ApiResponse::ok(tasks)))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let task = state
        .task_service
        .create(
            &auth,
            CreateTask {
                title: req.title,
                description: req.description,
                assignee_id: req.assignee_id,
                due_date: req.due_date,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// GET /api/tasks/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let task = state.task_service.get(&auth, task_id).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let task = state
        .task_service
        .update(
            &auth,
            task_id,
            UpdateTask {
                title: req.title,
                description: req.description,
                due_date: req.due_date,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// PUT /api/tasks/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let task = state
        .task_service
        .update_status(&auth, task_id, req.status)
        .await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// PUT /api/tasks/{id}/reassign
pub async fn reassign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    Json(req): Json<ReassignTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let task = state
        .task_service
        .reassign(&auth, task_id, req.assignee_id)
        .await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.task_service.delete(&auth, task_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Task deleted".to_string(),
    })))
}
