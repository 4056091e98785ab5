//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use telehub_auth::password::hasher::PasswordHasher;
use telehub_core::error::AppError;
use telehub_core::types::pagination::PageRequest;
use telehub_database::repositories::user::UserRepository;
use telehub_entity::user::model::CreateUser;
use telehub_entity::user::{UserRole, UserStatus};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a new user
    Create {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Role: admin, manager or employee
        #[arg(short, long, default_value = "employee")]
        role: UserRole,
        /// Organizational grade
        #[arg(short, long, default_value = "1")]
        grade: i16,
    },
    /// List users
    List {
        /// Filter by role
        #[arg(short, long)]
        role: Option<UserRole>,
    },
    /// Enable a user
    Enable {
        /// Username
        username: String,
    },
    /// Disable a user
    Disable {
        /// Username
        username: String,
    },
    /// Reset a user's password
    ResetPassword {
        /// Username
        #[arg(short, long)]
        username: String,
        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Grade
    grade: i16,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let user_repo = UserRepository::new(pool.clone());
    let hasher = PasswordHasher::new();

    match &args.command {
        UserCommand::Create {
            username,
            email,
            password,
            role,
            grade,
        } => {
            let username = match username {
                Some(u) => u.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
            };

            let email = match email {
                Some(e) => Some(e.clone()),
                None => {
                    let e: String = dialoguer::Input::new()
                        .with_prompt("Email (optional, press Enter to skip)")
                        .allow_empty(true)
                        .interact_text()
                        .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                    if e.is_empty() { None } else { Some(e) }
                }
            };

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
            };

            let password_hash = hasher.hash_password(&password)?;

            let create_user = CreateUser {
                username: username.clone(),
                email,
                password_hash,
                display_name: Some(username.clone()),
                role: *role,
                grade: *grade,
                created_by: None,
            };

            let user = user_repo.create(&create_user).await?;

            output::print_success(&format!(
                "User '{}' created (id: {}, role: {})",
                username, user.id, user.role
            ));
        }
        UserCommand::List { role } => {
            let page = PageRequest::new(1, 100);
            let users = match role {
                Some(role) => user_repo.find_by_role(*role, &page).await?,
                None => user_repo.find_all(&page).await?,
            };

            let rows: Vec<UserRow> = users
                .items
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    username: u.username.clone(),
                    email: u.email.clone().unwrap_or_default(),
                    role: u.role.to_string(),
                    grade: u.grade,
                    status: u.status.to_string(),
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        UserCommand::Enable { username } => {
            let user = user_repo
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{}' not found", username)))?;

            user_repo.update_status(user.id, UserStatus::Active).await?;

            output::print_success(&format!("User '{}' enabled", username));
        }
        UserCommand::Disable { username } => {
            let user = user_repo
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{}' not found", username)))?;

            user_repo
                .update_status(user.id, UserStatus::Inactive)
                .await?;

            output::print_success(&format!("User '{}' disabled", username));
        }
        UserCommand::ResetPassword { username, password } => {
            let user = user_repo
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{}' not found", username)))?;

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("New password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
            };

            let password_hash = hasher.hash_password(&password)?;
            user_repo.update_password(user.id, &password_hash).await?;

            output::print_success(&format!("Password reset for user '{}'", username));
        }
    }

    Ok(())
}
