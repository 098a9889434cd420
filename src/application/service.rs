use crate::application::stats::TaskStats;
use crate::domain::error::DomainError;
use crate::domain::models::{CreateTask, Task, UpdateTask};
use crate::domain::repository::{TaskRepository, UserRepository};
use crate::domain::user::{Identity, User};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub struct TaskService<T: TaskRepository, U: UserRepository> {
    tasks: Arc<T>,
    users: Arc<U>,
}

impl<T: TaskRepository, U: UserRepository> TaskService<T, U> {
    pub fn new(tasks: Arc<T>, users: Arc<U>) -> Self {
        Self { tasks, users }
    }

    #[instrument(skip(self), fields(email = %identity.email))]
    pub async fn list_tasks(&self, identity: &Identity) -> Result<Vec<Task>> {
        let Some(user) = self.users.find_user_by_email(&identity.email).await? else {
            debug!("No user record yet, returning empty list");
            return Ok(Vec::new());
        };
        self.tasks.find_tasks_by_user(&user.id).await
    }

    #[instrument(skip(self, req), fields(email = %identity.email, category = ?req.category))]
    pub async fn create_task(&self, identity: &Identity, req: CreateTask) -> Result<Task> {
        if req.text.trim().is_empty() {
            warn!("Rejecting task without text");
            return Err(DomainError::Validation("Missing text".to_string()).into());
        }

        let candidate = User {
            id: Uuid::new_v4().to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            created_at: Utc::now(),
        };
        let user = self.users.find_or_create_user(candidate).await?;

        let task = Task {
            id: Uuid::new_v4().to_string(),
            text: req.text,
            completed: false,
            category: req.category,
            created_at: Utc::now(),
            user_id: user.id,
        };
        self.tasks.save_task(task.clone()).await?;

        info!(task_id = %task.id, user_id = %task.user_id, "Task created");
        Ok(task)
    }

    #[instrument(skip(self), fields(email = %identity.email, task_id = %req.id))]
    pub async fn set_completion(&self, identity: &Identity, req: UpdateTask) -> Result<Task> {
        let mut task = self.owned_task(identity, &req.id).await?;
        task.completed = req.completed;
        if !self.tasks.update_task(task.clone()).await? {
            // Deleted between the ownership check and the write.
            warn!("Task vanished before completion update");
            return Err(DomainError::NotFound(format!("Task not found: {}", req.id)).into());
        }
        info!(completed = task.completed, "Task completion updated");
        Ok(task)
    }

    #[instrument(skip(self), fields(email = %identity.email))]
    pub async fn delete_task(&self, identity: &Identity, id: &str) -> Result<()> {
        let task = self.owned_task(identity, id).await?;
        if !self.tasks.delete_task(&task.id).await? {
            // Lost a race with another delete of the same task.
            return Err(DomainError::NotFound(format!("Task not found: {}", id)).into());
        }
        info!(task_id = %task.id, "Task deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(email = %identity.email))]
    pub async fn profile_stats(&self, identity: &Identity) -> Result<TaskStats> {
        let tasks = self.list_tasks(identity).await?;
        Ok(TaskStats::from_tasks(&tasks))
    }

    /// Tasks of other users are reported as missing.
    async fn owned_task(&self, identity: &Identity, id: &str) -> Result<Task> {
        let not_found = || DomainError::NotFound(format!("Task not found: {}", id));

        let user = self
            .users
            .find_user_by_email(&identity.email)
            .await?
            .ok_or_else(not_found)?;
        let task = self.tasks.find_task_by_id(id).await?.ok_or_else(not_found)?;

        if task.user_id != user.id {
            warn!(task_id = id, owner = %task.user_id, "Task belongs to another user");
            return Err(not_found().into());
        }
        Ok(task)
    }
}
