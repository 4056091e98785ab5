//! Task entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::TaskStatus;

/// A task assigned to a user through the grade hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique task identifier.
    pub id: Uuid,
    /// Short title.
    pub title: String,
    /// Longer description (optional).
    pub description: Option<String>,
    /// The user who created and assigned the task.
    pub assigner_id: Uuid,
    /// The user the task is assigned to.
    pub assignee_id: Uuid,
    /// Workflow status.
    pub status: TaskStatus,
    /// Due date (optional).
    pub due_date: Option<NaiveDate>,
    /// When the task reached a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short title.
    pub title: String,
    /// Longer description (optional).
    pub description: Option<String>,
    /// The user the task is assigned to.
    pub assignee_id: Uuid,
    /// Due date (optional).
    pub due_date: Option<NaiveDate>,
}

/// Data for updating an existing task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
}
