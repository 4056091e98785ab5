//! Attendance handlers — day/month views, reclassification, team roster.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{Datelike, NaiveDate, Utc};

use telehub_core::error::AppError;
use telehub_entity::attendance::AttendanceRecord;
use telehub_service::attendance::{SetAttendanceRequest, TeamAttendanceEntry};

use crate::dto::request::{AttendanceQuery, SetAttendanceBody};
use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/attendance
pub async fn month(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, AppError> {
    let user_id = query.user_id.unwrap_or(auth.user_id);
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let records = state
        .attendance_service
        .month(&auth, user_id, year, month)
        .await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// GET /api/attendance/{date}
pub async fn day(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<NaiveDate>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<ApiResponse<Option<AttendanceRecord>>>, AppError> {
    let user_id = query.user_id.unwrap_or(auth.user_id);
    let record = state.attendance_service.day(&auth, user_id, date).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// PUT /api/attendance/{date}
pub async fn set(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<NaiveDate>,
    Json(body): Json<SetAttendanceBody>,
) -> Result<Json<ApiResponse<AttendanceRecord>>, AppError> {
    let user_id = body.user_id.unwrap_or(auth.user_id);
    let record = state
        .attendance_service
        .set_record(
            &auth,
            user_id,
            SetAttendanceRequest {
                work_date: date,
                kind: body.kind,
                note: body.note,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// GET /api/attendance/team/today
pub async fn team_today(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<TeamAttendanceEntry>>>, AppError> {
    let today = Utc::now().date_naive();
    let entries = state.attendance_service.team_today(&auth, today).await?;
    Ok(Json(ApiResponse::ok(entries)))
}
