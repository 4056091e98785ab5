//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use telehub_entity::attendance::AttendanceKind;
use telehub_entity::task::TaskStatus;
use telehub_entity::user::{UserRole, UserStatus};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Check-in request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    /// Free-form note (optional).
    pub note: Option<String>,
}

/// Check-out request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutRequest {
    /// The session to close.
    pub session_id: Uuid,
    /// Free-form note (optional).
    pub note: Option<String>,
}

/// Query parameters for the session history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// User whose history to list; defaults to the caller.
    pub user_id: Option<Uuid>,
    /// First day of the range (inclusive).
    pub from: Option<NaiveDate>,
    /// Last day of the range (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

/// Query parameters for task listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListQuery {
    /// Assignee whose tasks to list; defaults to the caller.
    pub user_id: Option<Uuid>,
    /// Filter by workflow status.
    pub status: Option<TaskStatus>,
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

/// Query parameters for the admin user listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListQuery {
    /// Substring search over username and display name.
    pub q: Option<String>,
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

/// Create task request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Longer description (optional).
    pub description: Option<String>,
    /// The user the task is assigned to.
    pub assignee_id: Uuid,
    /// Due date (optional).
    pub due_date: Option<NaiveDate>,
}

/// Update task request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
}

/// Task status change request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskStatusRequest {
    /// Target workflow status.
    pub status: TaskStatus,
}

/// Task reassignment request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignTaskRequest {
    /// The new assignee.
    pub assignee_id: Uuid,
}

/// Query parameters for attendance month listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceQuery {
    /// User whose records to list; defaults to the caller.
    pub user_id: Option<Uuid>,
    /// Calendar year; defaults to the current year.
    pub year: Option<i32>,
    /// Calendar month (1-12); defaults to the current month.
    pub month: Option<u32>,
}

/// Attendance record body for `PUT /api/attendance/{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAttendanceBody {
    /// User the record belongs to; defaults to the caller.
    pub user_id: Option<Uuid>,
    /// Attendance kind for the day.
    pub kind: AttendanceKind,
    /// Free-form note (optional).
    pub note: Option<String>,
}

/// Role change request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    /// New role.
    pub role: UserRole,
}

/// Status change request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    /// New status.
    pub status: UserStatus,
}

/// Password reset request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// New password.
    pub new_password: String,
}

/// Forced check-out request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceCheckOutRequest {
    /// Reason recorded on the session's system activity.
    pub reason: Option<String>,
}
