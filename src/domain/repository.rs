use crate::domain::models::Task;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn save_task(&self, task: Task) -> Result<()>;
    async fn find_task_by_id(&self, id: &str) -> Result<Option<Task>>;
    /// Tasks owned by `user_id`, newest first.
    async fn find_tasks_by_user(&self, user_id: &str) -> Result<Vec<Task>>;
    /// Replaces an existing task. Returns `false` when no task had this id.
    async fn update_task(&self, task: Task) -> Result<bool>;
    /// Returns `false` when no task had this id.
    async fn delete_task(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Looks the user up by email and inserts `candidate` under the same lock
    /// when absent. The returned user is whichever one ends up stored.
    async fn find_or_create_user(&self, candidate: User) -> Result<User>;
    async fn count_users(&self) -> Result<usize>;
}
