//! Admin user management — CRUD, role changes, status changes, password resets.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use telehub_auth::guards;
use telehub_auth::password::{PasswordHasher, PasswordValidator};
use telehub_core::error::AppError;
use telehub_core::types::pagination::{PageRequest, PageResponse};
use telehub_database::repositories::user::UserRepository;
use telehub_entity::user::{CreateUser, UpdateUser, User, UserRole, UserStatus};

use crate::context::RequestContext;

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
}

/// Request to create a new user.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateUserRequest {
    /// Username (unique).
    pub username: String,
    /// Email (unique, optional).
    pub email: Option<String>,
    /// Initial password.
    pub password: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Role assignment.
    pub role: UserRole,
    /// Organizational grade.
    pub grade: i16,
}

/// Request to update a user (admin).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub display_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New organizational grade.
    pub grade: Option<i16>,
}

impl AdminUserService {
    /// Creates a new admin user service.
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

    /// Lists all users with pagination (manager view).
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        guards::require_manager(ctx.role)?;
        self.user_repo.find_all(page).await
    }

    /// Searches users by username or display name (manager view).
    pub async fn search_users(
        &self,
        ctx: &RequestContext,
        query: &str,
        page: &PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        guards::require_manager(ctx.role)?;
        self.user_repo.search(query, page).await
    }

    /// Gets a single user by ID (manager view).
    pub async fn get_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<User, AppError> {
        guards::require_manager(ctx.role)?;
        self.require_user(user_id).await
    }

    /// Creates a new user.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        req: CreateUserRequest,
    ) -> Result<User, AppError> {
        guards::require_admin(ctx.role)?;

        if req.username.trim().is_empty() || req.username.len() < 3 {
            return Err(AppError::validation(
                "Username must be at least 3 characters",
            ));
        }

        if self
            .user_repo
            .find_by_username(&req.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username is already taken"));
        }

        if let Some(ref email) = req.email {
            if self.user_repo.find_by_email(email).await?.is_some() {
                return Err(AppError::conflict("Email is already in use"));
            }
        }

        self.validator.validate(&req.password)?;
        let password_hash = self.hasher.hash_password(&req.password)?;

        let user = self
            .user_repo
            .create(&CreateUser {
                username: req.username,
                email: req.email,
                password_hash,
                display_name: req.display_name,
                role: req.role,
                grade: req.grade,
                created_by: Some(ctx.user_id),
            })
            .await?;

        info!(
            admin_id = %ctx.user_id,
            new_user_id = %user.id,
            username = %user.username,
            role = %user.role,
            grade = user.grade,
            "User created by admin"
        );

        Ok(user)
    }

    /// Updates a user's profile fields (admin).
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<User, AppError> {
        guards::require_admin(ctx.role)?;

        if let Some(ref email) = req.email {
            if let Some(existing) = self.user_repo.find_by_email(email).await? {
                if existing.id != user_id {
                    return Err(AppError::conflict("Email is already in use"));
                }
            }
        }

        let user = self
            .user_repo
            .update(&UpdateUser {
                id: user_id,
                email: req.email,
                display_name: req.display_name,
                grade: req.grade,
            })
            .await?;

        info!(admin_id = %ctx.user_id, target_id = %user_id, "User updated by admin");

        Ok(user)
    }

    /// Changes a user's role.
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        new_role: UserRole,
    ) -> Result<User, AppError> {
        guards::require_admin(ctx.role)?;

        if user_id == ctx.user_id {
            return Err(AppError::authorization("Cannot change your own role"));
        }

        let old = self.require_user(user_id).await?;
        let user = self.user_repo.update_role(user_id, new_role).await?;

        info!(
            admin_id = %ctx.user_id,
            target_id = %user_id,
            old_role = %old.role,
            new_role = %user.role,
            "User role changed"
        );

        Ok(user)
    }

    /// Changes a user's status (active, inactive, suspended).
    pub async fn change_status(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        new_status: UserStatus,
    ) -> Result<User, AppError> {
        guards::require_admin(ctx.role)?;

        if user_id == ctx.user_id {
            return Err(AppError::authorization("Cannot change your own status"));
        }

        self.require_user(user_id).await?;
        let user = self.user_repo.update_status(user_id, new_status).await?;

        info!(
            admin_id = %ctx.user_id,
            target_id = %user_id,
            new_status = %user.status,
            "User status changed"
        );

        Ok(user)
    }

    /// Resets a user's password (admin).
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), AppError> {
        guards::require_admin(ctx.role)?;

        self.require_user(user_id).await?;

        self.validator.validate(new_password)?;
        let hash = self.hasher.hash_password(new_password)?;

        self.user_repo.update_password(user_id, &hash).await?;

        info!(
            admin_id = %ctx.user_id,
            target_id = %user_id,
            "Password reset by admin"
        );

        Ok(())
    }

    /// Deletes a user.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        guards::require_admin(ctx.role)?;

        if user_id == ctx.user_id {
            return Err(AppError::authorization("Cannot delete your own account"));
        }

        self.require_user(user_id).await?;
        self.user_repo.delete(user_id).await?;

        info!(
            admin_id = %ctx.user_id,
            target_id = %user_id,
            "User deleted"
        );

        Ok(())
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
