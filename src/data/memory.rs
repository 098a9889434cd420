use crate::domain::models::Task;
use crate::domain::repository::TaskRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Tasks kept in insertion order so equal timestamps still list newest first.
#[derive(Clone)]
pub struct InMemoryTaskRepository {
    storage: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    #[instrument(skip(self, task), fields(task_id = %task.id, user_id = %task.user_id))]
    async fn save_task(&self, task: Task) -> Result<()> {
        let mut storage = self.storage.write().await;
        match storage.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => storage.push(task),
        }
        debug!(total = storage.len(), "Task saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_task_by_id(&self, id: &str) -> Result<Option<Task>> {
        let storage = self.storage.read().await;
        let task = storage.iter().find(|t| t.id == id).cloned();
        trace!(found = task.is_some(), "Looked up task by id");
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn find_tasks_by_user(&self, user_id: &str) -> Result<Vec<Task>> {
        let storage = self.storage.read().await;
        let mut tasks: Vec<Task> = storage
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps later insertions ahead on equal timestamps.
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = tasks.len(), "Tasks listed for user");
        Ok(tasks)
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn update_task(&self, task: Task) -> Result<bool> {
        let mut storage = self.storage.write().await;
        match storage.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task;
                debug!("Task updated in memory storage");
                Ok(true)
            }
            None => {
                trace!("Update for unknown task ignored");
                Ok(false)
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        let before = storage.len();
        storage.retain(|t| t.id != id);
        let removed = storage.len() < before;
        debug!(removed, "Task delete applied");
        Ok(removed)
    }
}
