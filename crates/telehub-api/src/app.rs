//! Application builder — wires repositories, services, realtime and the
//! background scheduler into a running Axum server.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::watch;

use telehub_core::config::AppConfig;
use telehub_core::error::AppError;
use telehub_core::events::ChangePublisher;
use telehub_database::repositories::attendance::AttendanceRepository;
use telehub_database::repositories::task::TaskRepository;
use telehub_database::repositories::telework_session::TeleworkSessionRepository;
use telehub_database::repositories::user::UserRepository;
use telehub_realtime::{FeedHub, HubPublisher};
use telehub_worker::scheduler::CronScheduler;

use crate::router::build_router;
use crate::state::AppState;

/// Runs the TeleHub server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    tracing::info!("Starting TeleHub server...");

    // ── Step 1: Initialize repositories ──────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let session_repo = Arc::new(TeleworkSessionRepository::new(db_pool.clone()));
    let attendance_repo = Arc::new(AttendanceRepository::new(db_pool.clone()));
    let task_repo = Arc::new(TaskRepository::new(db_pool.clone()));

    // ── Step 2: Initialize auth system ───────────────────────────
    let password_hasher = Arc::new(telehub_auth::password::hasher::PasswordHasher::new());
    let password_validator = Arc::new(telehub_auth::password::validator::PasswordValidator::new(
        &config.auth,
    ));
    let jwt_encoder = Arc::new(telehub_auth::jwt::encoder::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(telehub_auth::jwt::decoder::JwtDecoder::new(&config.auth));

    // ── Step 3: Initialize realtime feed ─────────────────────────
    let feed_hub = Arc::new(FeedHub::new(config.realtime.clone()));
    let publisher: Arc<dyn ChangePublisher> = Arc::new(HubPublisher::new(Arc::clone(&feed_hub)));

    // ── Step 4: Initialize services ──────────────────────────────
    let auth_service = Arc::new(telehub_service::AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
    ));
    let telework_service = Arc::new(telehub_service::TeleworkService::new(
        Arc::clone(&session_repo),
        Arc::clone(&attendance_repo),
        config.telework.clone(),
        Arc::clone(&publisher),
    ));
    let attendance_service = Arc::new(telehub_service::AttendanceService::new(
        Arc::clone(&attendance_repo),
        Arc::clone(&session_repo),
        Arc::clone(&user_repo),
    ));
    let task_service = Arc::new(telehub_service::TaskService::new(
        Arc::clone(&task_repo),
        Arc::clone(&user_repo),
        Arc::clone(&publisher),
    ));
    let report_service = Arc::new(telehub_service::ReportService::new(
        Arc::clone(&user_repo),
        Arc::clone(&session_repo),
        Arc::clone(&task_repo),
        Arc::clone(&attendance_repo),
    ));
    let user_service = Arc::new(telehub_service::UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
    ));
    let admin_user_service = Arc::new(telehub_service::AdminUserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
    ));

    // ── Step 5: Shutdown channel & keepalive loop ────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    spawn_keepalive_loop(
        Arc::clone(&feed_hub),
        config.realtime.ping_interval_seconds,
        shutdown_rx.clone(),
    );

    // ── Step 6: Start background scheduler ───────────────────────
    let scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(config.worker.clone()).await?;
        scheduler
            .register_default_jobs(
                Arc::clone(&telework_service),
                Arc::clone(&attendance_service),
            )
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background scheduler disabled by configuration");
        None
    };

    // ── Step 7: Build and start HTTP server ──────────────────────
    let app_state = AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        jwt_encoder,
        jwt_decoder,
        password_hasher,
        password_validator,
        feed_hub,
        user_repo,
        session_repo,
        attendance_repo,
        task_repo,
        auth_service,
        telework_service,
        attendance_service,
        task_service,
        report_service,
        user_service,
        admin_user_service,
    };

    let app = build_router(app_state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("TeleHub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }

    tracing::info!("TeleHub server stopped");
    Ok(())
}

/// Periodically pings feed connections and drops those that missed
/// their pong deadline.
fn spawn_keepalive_loop(
    hub: Arc<FeedHub>,
    interval_seconds: u64,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    hub.ping_all();
                    let dropped = hub.drop_unresponsive();
                    if dropped > 0 {
                        tracing::info!(dropped, "Dropped unresponsive feed connections");
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
    }
}
