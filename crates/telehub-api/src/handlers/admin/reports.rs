//! Admin reporting handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use telehub_core::error::AppError;
use telehub_service::report::{OverviewReport, WeeklyReport};

use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/reports/overview
pub async fn overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<OverviewReport>>, AppError> {
    let report = state.report_service.overview(&auth).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/admin/reports/weekly/{user_id}
pub async fn weekly(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<WeeklyReport>>, AppError> {
    let report = state.report_service.weekly(&auth, user_id).await?;
    Ok(Json(ApiResponse::ok(report)))
}
