//! Self-service profile handlers.

use axum::Json;
use axum::extract::State;

use telehub_core::error::AppError;
use telehub_service::user::{ChangePasswordRequest, UpdateProfileRequest};

use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.user_service.update_profile(&auth, req).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.user_service.change_password(&auth, req).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Password changed".to_string(),
    })))
}
