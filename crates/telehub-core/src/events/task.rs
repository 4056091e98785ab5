//! Task change events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events describing task mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// A task was created and assigned.
    Assigned {
        /// The task ID.
        task_id: Uuid,
        /// The user who assigned the task.
        assigner_id: Uuid,
        /// The user the task was assigned to.
        assignee_id: Uuid,
        /// The task title.
        title: String,
    },
    /// A task's title, description, or due date changed.
    Updated {
        /// The task ID.
        task_id: Uuid,
        /// The user the task is assigned to.
        assignee_id: Uuid,
    },
    /// A task moved to a new workflow status.
    StatusChanged {
        /// The task ID.
        task_id: Uuid,
        /// The user the task is assigned to.
        assignee_id: Uuid,
        /// The new status (`todo`, `in_progress`, `done`, `cancelled`).
        status: String,
    },
}

impl TaskEvent {
    /// The user whose channel should receive this event.
    pub fn assignee_id(&self) -> Uuid {
        match self {
            Self::Assigned { assignee_id, .. } => *assignee_id,
            Self::Updated { assignee_id, .. } => *assignee_id,
            Self::StatusChanged { assignee_id, .. } => *assignee_id,
        }
    }
}
