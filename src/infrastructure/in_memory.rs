//! In-memory task store.
//!
//! Suitable for tests and local development. All state lives in a single
//! `Arc<RwLock<HashMap<..>>>`, so clones of the repository share the same tasks.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Task, TaskChanges, TaskId, Timestamp};
use crate::infrastructure::repository::sort_newest_first;
use crate::infrastructure::{RepositoryError, TaskRepository};

/// In-memory implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// use task_tracker::infrastructure::{InMemoryTaskRepository, TaskRepository};
///
/// let repository = InMemoryTaskRepository::new();
/// let task = repository.create("Buy milk").await?;
/// let found = repository.find_by_id(&task.id).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty in-memory task repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, title: &str) -> Result<Task, RepositoryError> {
        let task = Task::new(TaskId::generate(), title, Timestamp::now());
        let mut guard = self.tasks.write().await;
        guard.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list_newest_first(&self) -> Result<Vec<Task>, RepositoryError> {
        let guard = self.tasks.read().await;
        let mut tasks: Vec<Task> = guard.values().cloned().collect();
        sort_newest_first(&mut tasks);
        Ok(tasks)
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError> {
        let guard = self.tasks.read().await;
        Ok(guard.get(id).cloned())
    }

    async fn update(
        &self,
        id: &TaskId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, RepositoryError> {
        let mut guard = self.tasks.write().await;
        let Some(existing) = guard.remove(id) else {
            return Ok(None);
        };
        let updated = existing.apply(changes, Timestamp::now());
        guard.insert(*id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError> {
        let mut guard = self.tasks.write().await;
        Ok(guard.remove(id))
    }
}

// =============================================================================
// Tests
// =============================================================================
