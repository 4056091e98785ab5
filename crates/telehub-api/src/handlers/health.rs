//! Health check handler.

use axum::Json;
use axum::extract::State;

use telehub_core::error::AppError;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, AppError> {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => "up",
        Err(_) => "down",
    };

    let status = if database == "up" { "ok" } else { "degraded" };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        feed_connections: state.feed_hub.connection_count(),
    }))
}
