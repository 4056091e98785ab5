//! Route definitions for the TeleHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(telework_routes())
        .merge(task_routes())
        .merge(attendance_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: login, logout, refresh, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
}

/// User self-service endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::get_profile))
        .route("/users/me", put(handlers::user::update_profile))
        .route("/users/me/password", put(handlers::user::change_password))
}

/// Telework session lifecycle
fn telework_routes() -> Router<AppState> {
    Router::new()
        .route("/telework/today", get(handlers::telework::today))
        .route("/telework/check-in", post(handlers::telework::check_in))
        .route("/telework/check-out", post(handlers::telework::check_out))
        .route("/telework/heartbeat", post(handlers::telework::heartbeat))
        .route("/telework/sessions", get(handlers::telework::history))
}

/// Task CRUD and workflow moves
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(handlers::task::list))
        .route("/tasks", post(handlers::task::create))
        .route("/tasks/created", get(handlers::task::list_created))
        .route("/tasks/{id}", get(handlers::task::get))
        .route("/tasks/{id}", put(handlers::task::update))
        .route("/tasks/{id}", delete(handlers::task::delete))
        .route("/tasks/{id}/status", put(handlers::task::update_status))
        .route("/tasks/{id}/reassign", put(handlers::task::reassign))
}

/// Attendance views and reclassification
fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(handlers::attendance::month))
        .route(
            "/attendance/team/today",
            get(handlers::attendance::team_today),
        )
        .route("/attendance/{date}", get(handlers::attendance::day))
        .route("/attendance/{date}", put(handlers::attendance::set))
}

/// Admin-only endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        // User management
        .route("/admin/users", get(handlers::admin::users::list))
        .route("/admin/users", post(handlers::admin::users::create))
        .route("/admin/users/{id}", get(handlers::admin::users::get))
        .route("/admin/users/{id}", put(handlers::admin::users::update))
        .route(
            "/admin/users/{id}",
            delete(handlers::admin::users::delete),
        )
        .route(
            "/admin/users/{id}/role",
            put(handlers::admin::users::change_role),
        )
        .route(
            "/admin/users/{id}/status",
            put(handlers::admin::users::change_status),
        )
        .route(
            "/admin/users/{id}/reset-password",
            put(handlers::admin::users::reset_password),
        )
        // Session oversight
        .route(
            "/admin/sessions",
            get(handlers::admin::sessions::list_open),
        )
        .route(
            "/admin/sessions/{id}/force-checkout",
            post(handlers::admin::sessions::force_checkout),
        )
        // Reports
        .route(
            "/admin/reports/overview",
            get(handlers::admin::reports::overview),
        )
        .route(
            "/admin/reports/weekly/{user_id}",
            get(handlers::admin::reports::weekly),
        )
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors = cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds));

    cors
}
