//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use telehub_core::config::AppConfig;
use telehub_core::events::ChangePublisher;
use telehub_realtime::{FeedHub, HubPublisher};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let config = AppConfig::load("test").expect("Failed to load test config");

        let db = telehub_database::connection::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.into_pool();

        telehub_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let user_repo = Arc::new(telehub_database::repositories::user::UserRepository::new(
            db_pool.clone(),
        ));
        let session_repo = Arc::new(
            telehub_database::repositories::telework_session::TeleworkSessionRepository::new(
                db_pool.clone(),
            ),
        );
        let attendance_repo = Arc::new(
            telehub_database::repositories::attendance::AttendanceRepository::new(db_pool.clone()),
        );
        let task_repo = Arc::new(telehub_database::repositories::task::TaskRepository::new(
            db_pool.clone(),
        ));

        let password_hasher = Arc::new(telehub_auth::password::hasher::PasswordHasher::new());
        let password_validator = Arc::new(
            telehub_auth::password::validator::PasswordValidator::new(&config.auth),
        );
        let jwt_encoder = Arc::new(telehub_auth::jwt::encoder::JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(telehub_auth::jwt::decoder::JwtDecoder::new(&config.auth));

        let feed_hub = Arc::new(FeedHub::new(config.realtime.clone()));
        let publisher: Arc<dyn ChangePublisher> =
            Arc::new(HubPublisher::new(Arc::clone(&feed_hub)));

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

        let app_state = telehub_api::state::AppState {
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

        let router = telehub_api::build_router(app_state);

        Self {
            router,
            db_pool,
            config,
        }
    }

    /// Clean all test data from the database
    async fn clean_database(pool: &PgPool) {
        let tables = ["attendance_records", "tasks", "telework_sessions", "users"];

        for table in &tables {
            let query = format!("DELETE FROM {}", table);
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a test user and return their ID
    pub async fn create_test_user(
        &self,
        username: &str,
        password: &str,
        role: &str,
        grade: i16,
    ) -> Uuid {
        let hasher = telehub_auth::password::hasher::PasswordHasher::new();
        let hash = hasher.hash_password(password).expect("Failed to hash password");
        let id = Uuid::new_v4();

        sqlx::query(
            r#"INSERT INTO users (id, username, email, password_hash, display_name, role, grade, status, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6::user_role, $7, 'active'::user_status, NOW(), NOW())"#,
        )
        .bind(id)
        .bind(username)
        .bind(format!("{}@test.com", username))
        .bind(&hash)
        .bind(username)
        .bind(role)
        .bind(grade)
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test user");

        id
    }

    /// Login and return JWT access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
