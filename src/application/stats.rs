use crate::domain::models::Task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completion statistics over one user's tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Percentage rounded half up, 0 when there are no tasks.
    pub completion_rate: u32,
    pub categories: BTreeMap<String, usize>,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|t| t.completed).count();
        Self {
            total_tasks,
            completed_tasks,
            completion_rate: completion_rate(completed_tasks, total_tasks),
            categories: category_counts(tasks),
        }
    }
}

pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (completed, total) = (completed as u64, total as u64);
    ((200 * completed + total) / (2 * total)) as u32
}

pub fn category_counts(tasks: &[Task]) -> BTreeMap<String, usize> {
    tasks.iter().fold(BTreeMap::new(), |mut acc, task| {
        *acc.entry(task.category_label().to_string()).or_insert(0) += 1;
        acc
    })
}
