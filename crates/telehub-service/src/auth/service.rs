//! Login, token refresh, and current-user resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use telehub_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use telehub_auth::password::PasswordHasher;
use telehub_core::error::AppError;
use telehub_database::repositories::user::UserRepository;
use telehub_entity::user::User;

use crate::context::RequestContext;

/// Handles authentication use cases.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// JWT encoder.
    encoder: Arc<JwtEncoder>,
    /// JWT decoder.
    decoder: Arc<JwtDecoder>,
}

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// The issued token pair.
    pub tokens: TokenPair,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            encoder,
            decoder,
        }
    }

    /// Authenticates a user by username and password.
    ///
    /// Failures deliberately return the same error message whether the
    /// username or the password was wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AppError> {
        let user = match self.user_repo.find_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!(username, "Login attempt for unknown username");
                return Err(AppError::authentication("Invalid username or password"));
            }
        };

        let valid = self.hasher.verify_password(password, &user.password_hash)?;
        if !valid {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::authentication("Invalid username or password"));
        }

        if !user.can_login() {
            return Err(AppError::authentication("Account is not active"));
        }

        self.user_repo.update_last_login(user.id).await?;

        let tokens = self
            .encoder
            .generate_token_pair(user.id, &user.role, &user.username)?;

        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(LoginResult { user, tokens })
    }

    /// Issues a fresh access token from a valid refresh token.
    pub async fn refresh(
        &self,
        refresh_token: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::authentication("User no longer exists"))?;

        if !user.can_login() {
            return Err(AppError::authentication("Account is not active"));
        }

        self.encoder
            .generate_access_token(user.id, &user.role, &user.username)
    }

    /// Returns the full profile of the authenticated user.
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Records a logout.
    ///
    /// Tokens are stateless, so this only logs the event; the client is
    /// responsible for discarding its copy.
    pub fn logout(&self, ctx: &RequestContext) {
        info!(user_id = %ctx.user_id, "User logged out");
    }
}
