//! Task assignment and workflow — create, update, status moves, reassignment.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use telehub_auth::guards;
use telehub_core::error::AppError;
use telehub_core::events::{ChangeEvent, ChangePayload, ChangePublisher, TaskEvent};
use telehub_core::types::pagination::{PageRequest, PageResponse};
use telehub_database::repositories::task::TaskRepository;
use telehub_database::repositories::user::UserRepository;
use telehub_entity::task::{CreateTask, Task, TaskStatus, UpdateTask};
use telehub_entity::user::User;

use crate::context::RequestContext;

/// Handles task assignment and workflow operations.
#[derive(Clone)]
pub struct TaskService {
    /// Task repository.
    task_repo: Arc<TaskRepository>,
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Change event sink.
    publisher: Arc<dyn ChangePublisher>,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService").finish()
    }
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(
        task_repo: Arc<TaskRepository>,
        user_repo: Arc<UserRepository>,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Self {
        Self {
            task_repo,
            user_repo,
            publisher,
        }
    }

    /// Creates a task and assigns it.
    ///
    /// The assigner must outrank the assignee in the grade hierarchy
    /// unless they are an admin or assigning to themselves.
    pub async fn create(&self, ctx: &RequestContext, data: CreateTask) -> Result<Task, AppError> {
        if data.title.trim().is_empty() {
            return Err(AppError::validation("Task title must not be empty"));
        }

        let assigner = self.require_user(ctx.user_id).await?;
        let assignee = self.require_user(data.assignee_id).await?;

        if !assignee.can_login() {
            return Err(AppError::validation(
                "Cannot assign a task to an inactive user",
            ));
        }
        if !assigner.can_assign_to(&assignee) {
            return Err(AppError::authorization(
                "Assigning a task requires a higher grade than the assignee",
            ));
        }

        let task = self.task_repo.create(ctx.user_id, &data).await?;

        info!(
            task_id = %task.id,
            assigner_id = %ctx.user_id,
            assignee_id = %task.assignee_id,
            "Task created"
        );

        self.publish(
            ctx.user_id,
            TaskEvent::Assigned {
                task_id: task.id,
                assigner_id: task.assigner_id,
                assignee_id: task.assignee_id,
                title: task.title.clone(),
            },
        );

        Ok(task)
    }

    /// Fetches a single task.
    ///
    /// Visible to the assigner, the assignee, and managers.
    pub async fn get(&self, ctx: &RequestContext, task_id: Uuid) -> Result<Task, AppError> {
        let task = self.require_task(task_id).await?;

        if task.assigner_id != ctx.user_id
            && task.assignee_id != ctx.user_id
            && !ctx.is_manager_or_above()
        {
            return Err(AppError::authorization("Not allowed to view this task"));
        }

        Ok(task)
    }

    /// Lists tasks assigned to a user, optionally filtered by status.
    pub async fn list_assigned(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        status: Option<TaskStatus>,
        page: &PageRequest,
    ) -> Result<PageResponse<Task>, AppError> {
        guards::require_self_or_manager(ctx.user_id, ctx.role, user_id)?;
        self.task_repo.list_assigned(user_id, status, page).await
    }

    /// Lists tasks the caller has created.
    pub async fn list_created(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<Task>, AppError> {
        self.task_repo.list_created(ctx.user_id, page).await
    }

    /// Updates a task's title, description, or due date.
    ///
    /// Only the assigner (or an admin) may edit the task itself.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<Task, AppError> {
        let task = self.require_task(task_id).await?;

        if task.assigner_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only the assigner may edit this task",
            ));
        }
        if let Some(ref title) = data.title {
            if title.trim().is_empty() {
                return Err(AppError::validation("Task title must not be empty"));
            }
        }

        let task = self.task_repo.update(task_id, &data).await?;

        info!(task_id = %task.id, editor_id = %ctx.user_id, "Task updated");

        self.publish(
            ctx.user_id,
            TaskEvent::Updated {
                task_id: task.id,
                assignee_id: task.assignee_id,
            },
        );

        Ok(task)
    }

    /// Moves a task to a new workflow status.
    ///
    /// The assignee works the task; the assigner may also move it, for
    /// example to cancel it.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
        status: TaskStatus,
    ) -> Result<Task, AppError> {
        let task = self.require_task(task_id).await?;

        if task.assignee_id != ctx.user_id && task.assigner_id != ctx.user_id {
            return Err(AppError::authorization(
                "Only the assignee or assigner may change the task status",
            ));
        }

        let task = self.task_repo.update_status(task_id, status).await?;

        info!(
            task_id = %task.id,
            actor_id = %ctx.user_id,
            status = %task.status,
            "Task status changed"
        );

        self.publish(
            ctx.user_id,
            TaskEvent::StatusChanged {
                task_id: task.id,
                assignee_id: task.assignee_id,
                status: task.status.to_string(),
            },
        );

        Ok(task)
    }

    /// Moves a task to a different assignee.
    ///
    /// The grade rule applies against the new assignee.
    pub async fn reassign(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
        assignee_id: Uuid,
    ) -> Result<Task, AppError> {
        let task = self.require_task(task_id).await?;

        if task.assigner_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only the assigner may reassign this task",
            ));
        }

        let actor = self.require_user(ctx.user_id).await?;
        let assignee = self.require_user(assignee_id).await?;

        if !assignee.can_login() {
            return Err(AppError::validation(
                "Cannot assign a task to an inactive user",
            ));
        }
        if !actor.can_assign_to(&assignee) {
            return Err(AppError::authorization(
                "Assigning a task requires a higher grade than the assignee",
            ));
        }

        let task = self.task_repo.reassign(task_id, assignee_id).await?;

        info!(
            task_id = %task.id,
            actor_id = %ctx.user_id,
            assignee_id = %assignee_id,
            "Task reassigned"
        );

        self.publish(
            ctx.user_id,
            TaskEvent::Assigned {
                task_id: task.id,
                assigner_id: task.assigner_id,
                assignee_id: task.assignee_id,
                title: task.title.clone(),
            },
        );

        Ok(task)
    }

    /// Deletes a task.
    pub async fn delete(&self, ctx: &RequestContext, task_id: Uuid) -> Result<(), AppError> {
        let task = self.require_task(task_id).await?;

        if task.assigner_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only the assigner may delete this task",
            ));
        }

        self.task_repo.delete(task_id).await?;

        info!(task_id = %task_id, actor_id = %ctx.user_id, "Task deleted");

        Ok(())
    }

    async fn require_task(&self, task_id: Uuid) -> Result<Task, AppError> {
        self.task_repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Task {task_id} not found")))
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    fn publish(&self, actor_id: Uuid, event: TaskEvent) {
        self.publisher
            .publish(ChangeEvent::new(Some(actor_id), ChangePayload::Task(event)));
    }
}
