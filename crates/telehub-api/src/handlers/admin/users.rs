//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use telehub_core::error::AppError;
use telehub_core::types::pagination::{PageRequest, PageResponse};
use telehub_entity::user::User;
use telehub_service::user::{CreateUserRequest, UpdateUserRequest};

use crate::dto::request::{ChangeRoleRequest, ChangeStatusRequest, ResetPasswordRequest, UserListQuery};
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

fn page_of(users: PageResponse<User>) -> PageResponse<UserResponse> {
    PageResponse::new(
        users.items.into_iter().map(UserResponse::from).collect(),
        users.page,
        users.page_size,
        users.total_items,
    )
}

/// GET /api/admin/users
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<ApiResponse<PageResponse<UserResponse>>>, AppError> {
    let page = PageRequest::new(query.page, query.per_page);

    let users = match query.q.as_deref() {
        Some(q) if !q.trim().is_empty() => {
            state.admin_user_service.search_users(&auth, q, &page).await?
        }
        _ => state.admin_user_service.list_users(&auth, &page).await?,
    };
    Ok(Json(ApiResponse::ok(page_of(users))))
}

/// GET /api/admin/users/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.admin_user_service.get_user(&auth, user_id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/admin/users
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.admin_user_service.create_user(&auth, req).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state
        .admin_user_service
        .update_user(&auth, user_id, req)
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/admin/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state
        .admin_user_service
        .change_role(&auth, user_id, req.role)
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/admin/users/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state
        .admin_user_service
        .change_status(&auth, user_id, req.status)
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .admin_user_service
        .reset_password(&auth, user_id, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Password reset".to_string(),
    })))
}

/// DELETE /api/admin/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.admin_user_service.delete_user(&auth, user_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "User deleted".to_string(),
    })))
}
