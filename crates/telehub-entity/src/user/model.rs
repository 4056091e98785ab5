//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::status::UserStatus;

/// A registered user in the TeleHub system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// User role (RBAC).
    pub role: UserRole,
    /// Organizational grade. Higher values outrank lower ones.
    pub grade: i16,
    /// Account status.
    pub status: UserStatus,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// The admin who created this user.
    pub created_by: Option<Uuid>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if this user may assign a task to `assignee`.
    ///
    /// Admins may assign to anyone. Everyone else must strictly outrank
    /// the assignee in the grade hierarchy. Self-assignment is always
    /// allowed.
    pub fn can_assign_to(&self, assignee: &User) -> bool {
        if self.is_admin() || self.id == assignee.id {
            return true;
        }
        self.grade > assignee.grade
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Assigned role.
    pub role: UserRole,
    /// Organizational grade.
    pub grade: i16,
    /// Creating admin's user ID (optional).
    pub created_by: Option<Uuid>,
}

/// Data for updating an existing user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    /// The user ID to update.
    pub id: Uuid,
    /// New email address.
    pub email: Option<String>,
    /// New display name.
    pub display_name: Option<String>,
    /// New organizational grade.
    pub grade: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, grade: i16) -> User {
        User {
            id: Uuid::new_v4(),
            username: "someone".to_string(),
            email: None,
            password_hash: "x".to_string(),
            display_name: None,
            role,
            grade,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
            created_by: None,
        }
    }

    #[test]
    fn higher_grade_can_assign_down() {
        let manager = user(UserRole::Manager, 5);
        let employee = user(UserRole::Employee, 3);
        assert!(manager.can_assign_to(&employee));
        assert!(!employee.can_assign_to(&manager));
    }

    #[test]
    fn equal_grade_cannot_assign() {
        let a = user(UserRole::Employee, 3);
        let b = user(UserRole::Employee, 3);
        assert!(!a.can_assign_to(&b));
    }

    #[test]
    fn admin_ignores_grade() {
        let admin = user(UserRole::Admin, 1);
        let senior = user(UserRole::Manager, 9);
        assert!(admin.can_assign_to(&senior));
    }

    #[test]
    fn self_assignment_is_allowed() {
        let me = user(UserRole::Employee, 3);
        assert!(me.can_assign_to(&me));
    }
}
