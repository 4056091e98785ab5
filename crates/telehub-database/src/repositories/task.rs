//! Task repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use telehub_core::error::{AppError, ErrorKind};
use telehub_core::result::AppResult;
use telehub_core::types::pagination::{PageRequest, PageResponse};
use telehub_entity::task::model::{CreateTask, UpdateTask};
use telehub_entity::task::{Task, TaskStatus};

/// Repository for task CRUD and query operations.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a task by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find task", e))
    }

    /// Create a new task.
    pub async fn create(&self, assigner_id: Uuid, data: &CreateTask) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, description, assigner_id, assignee_id, due_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(assigner_id)
        .bind(data.assignee_id)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create task", e))
    }

    /// List tasks assigned to a user, optionally filtered by status.
    pub async fn list_assigned(
        &self,
        assignee_id: Uuid,
        status: Option<TaskStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Task>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks \
             WHERE assignee_id = $1 AND ($2::task_status IS NULL OR status = $2)",
        )
        .bind(assignee_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count assigned tasks", e)
        })?;

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks \
             WHERE assignee_id = $1 AND ($2::task_status IS NULL OR status = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(assignee_id)
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list assigned tasks", e)
        })?;

        Ok(PageResponse::new(
            tasks,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List tasks created by a user.
    pub async fn list_created(
        &self,
        assigner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Task>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE assigner_id = $1")
            .bind(assigner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count created tasks", e)
            })?;

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE assigner_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(assigner_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list created tasks", e)
        })?;

        Ok(PageResponse::new(
            tasks,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Update a task's editable fields.
    pub async fn update(&self, task_id: Uuid, data: &UpdateTask) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET title = COALESCE($2, title), \
                              description = COALESCE($3, description), \
                              due_date = COALESCE($4, due_date), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(task_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update task", e))?
        .ok_or_else(|| AppError::not_found(format!("Task {task_id} not found")))
    }

    /// Update a task's status.
    pub async fn update_status(&self, task_id: Uuid, status: TaskStatus) -> AppResult<Task> {
        let completed_at: Option<DateTime<Utc>> = if status == TaskStatus::Done {
            Some(Utc::now())
        } else {
            None
        };

        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $2, completed_at = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(task_id)
        .bind(&status)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update task status", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Task {task_id} not found")))
    }

    /// Move a task to a different assignee.
    pub async fn reassign(&self, task_id: Uuid, assignee_id: Uuid) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET assignee_id = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(task_id)
        .bind(assignee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reassign task", e))?
        .ok_or_else(|| AppError::not_found(format!("Task {task_id} not found")))
    }

    /// Delete a task by ID.
    pub async fn delete(&self, task_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete task", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count tasks grouped by status.
    pub async fn count_by_status(&self) -> AppResult<Vec<(TaskStatus, i64)>> {
        sqlx::query_as::<_, (TaskStatus, i64)>(
            "SELECT status, COUNT(*) FROM tasks GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count tasks by status", e)
        })
    }

    /// Count open tasks assigned to a user.
    pub async fn count_open_by_assignee(&self, assignee_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks \
             WHERE assignee_id = $1 AND status IN ('todo', 'in_progress')",
        )
        .bind(assignee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count open tasks", e)
        })?;
        Ok(count as u64)
    }
}
