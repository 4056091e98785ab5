//! Telework session handlers.
//!
//! Session endpoints return the entity directly rather than the usual
//! envelope; the session client consumes these bodies as-is.

use axum::Json;
use axum::extract::{Query, State};

use telehub_core::error::AppError;
use telehub_core::types::pagination::{PageRequest, PageResponse};
use telehub_entity::session::TeleworkSession;
use telehub_service::telework::HeartbeatRequest;

use crate::dto::request::{CheckInRequest, CheckOutRequest, HistoryQuery};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/telework/today
pub async fn today(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Option<TeleworkSession>>, AppError> {
    let session = state.telework_service.today(&auth).await?;
    Ok(Json(session))
}

/// POST /api/telework/check-in
pub async fn check_in(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<TeleworkSession>, AppError> {
    let session = state.telework_service.check_in(&auth, req.note).await?;
    Ok(Json(session))
}

/// POST /api/telework/check-out
pub async fn check_out(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckOutRequest>,
) -> Result<Json<TeleworkSession>, AppError> {
    let session = state
        .telework_service
        .check_out(&auth, req.session_id, req.note)
        .await?;
    Ok(Json(session))
}

/// POST /api/telework/heartbeat
pub async fn heartbeat(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<HeartbeatRequest>,
) -> Result<Json<TeleworkSession>, AppError> {
    let session = state.telework_service.heartbeat(&auth, req).await?;
    Ok(Json(session))
}

/// GET /api/telework/sessions
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<PageResponse<TeleworkSession>>, AppError> {
    let user_id = query.user_id.unwrap_or(auth.user_id);
    let page = PageRequest::new(query.page, query.per_page);

    let sessions = state
        .telework_service
        .history(&auth, user_id, query.from, query.to, &page)
        .await?;
    Ok(Json(sessions))
}
