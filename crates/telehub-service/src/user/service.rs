//! Self-service profile management.

use std::sync::Arc;

use tracing::info;

use telehub_auth::password::{PasswordHasher, PasswordValidator};
use telehub_core::error::AppError;
use telehub_database::repositories::user::UserRepository;
use telehub_entity::user::{UpdateUser, User};

use crate::context::RequestContext;

/// Handles a user's own profile operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
}

/// Request to update the caller's own profile.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub display_name: Option<String>,
    /// New email.
    pub email: Option<String>,
}

/// Request to change the caller's own password.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ChangePasswordRequest {
    /// The current password, for verification.
    pub current_password: String,
    /// The new password.
    pub new_password: String,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
        }
    }

    /// Returns the caller's profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the caller's display name or email.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        req: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        if let Some(ref display_name) = req.display_name {
            if display_name.trim().is_empty() {
                return Err(AppError::validation("Display name must not be empty"));
            }
        }

        if let Some(ref email) = req.email {
            if let Some(existing) = self.user_repo.find_by_email(email).await? {
                if existing.id != ctx.user_id {
                    return Err(AppError::conflict("Email is already in use"));
                }
            }
        }

        let user = self
            .user_repo
            .update(&UpdateUser {
                id: ctx.user_id,
                email: req.email,
                display_name: req.display_name,
                grade: None,
            })
            .await?;

        info!(user_id = %ctx.user_id, "Profile updated");

        Ok(user)
    }

    /// Changes the caller's password after verifying the current one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        req: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let user = self.get_profile(ctx).await?;

        let valid = self
            .hasher
            .verify_password(&req.current_password, &user.password_hash)?;
        if !valid {
            return Err(AppError::authentication("Current password is incorrect"));
        }

        self.validator.validate(&req.new_password)?;
        self.validator
            .validate_not_same(&req.current_password, &req.new_password)?;

        let hash = self.hasher.hash_password(&req.new_password)?;
        self.user_repo.update_password(ctx.user_id, &hash).await?;

        info!(user_id = %ctx.user_id, "Password changed");

        Ok(())
    }
}
