//! Admin session oversight handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use telehub_core::error::AppError;
use telehub_core::types::pagination::PageResponse;
use telehub_entity::session::TeleworkSession;

use crate::dto::request::ForceCheckOutRequest;
use crate::dto::response::ApiResponse;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/sessions
pub async fn list_open(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<TeleworkSession>>>, AppError> {
    let page = params.into_page_request();
    let sessions = state.telework_service.list_open(&auth, &page).await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// POST /api/admin/sessions/{id}/force-checkout
pub async fn force_checkout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
    Json(req): Json<ForceCheckOutRequest>,
) -> Result<Json<ApiResponse<TeleworkSession>>, AppError> {
    let session = state
        .telework_service
        .force_check_out(&auth, session_id, req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(session)))
}
