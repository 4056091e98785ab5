//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use telehub_auth::jwt::decoder::JwtDecoder;
use telehub_auth::jwt::encoder::JwtEncoder;
use telehub_auth::password::{PasswordHasher, PasswordValidator};
use telehub_core::config::AppConfig;
use telehub_realtime::FeedHub;

use telehub_database::repositories::attendance::AttendanceRepository;
use telehub_database::repositories::task::TaskRepository;
use telehub_database::repositories::telework_session::TeleworkSessionRepository;
use telehub_database::repositories::user::UserRepository;

use telehub_service::{
    AdminUserService, AttendanceService, AuthService, ReportService, TaskService, TeleworkService,
    UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Password policy validator
    pub password_validator: Arc<PasswordValidator>,

    // ── Realtime ─────────────────────────────────────────────
    /// WebSocket change feed hub
    pub feed_hub: Arc<FeedHub>,

    // ── Repositories ─────────────────────────────────────────
    /// User repository
    pub user_repo: Arc<UserRepository>,
    /// Telework session repository
    pub session_repo: Arc<TeleworkSessionRepository>,
    /// Attendance repository
    pub attendance_repo: Arc<AttendanceRepository>,
    /// Task repository
    pub task_repo: Arc<TaskRepository>,

    // ── Services ─────────────────────────────────────────────
    /// Authentication service
    pub auth_service: Arc<AuthService>,
    /// Telework session service
    pub telework_service: Arc<TeleworkService>,
    /// Attendance service
    pub attendance_service: Arc<AttendanceService>,
    /// Task service
    pub task_service: Arc<TaskService>,
    /// Reporting service
    pub report_service: Arc<ReportService>,
    /// Self-service profile service
    pub user_service: Arc<UserService>,
    /// Admin user management service
    pub admin_user_service: Arc<AdminUserService>,
}
