//! Task store stand-in used when no database connection could be established.
//!
//! The server keeps listening after a failed startup connection; every store
//! call then fails with [`RepositoryError::Unavailable`] and surfaces as a 500.

use async_trait::async_trait;

use crate::domain::{Task, TaskChanges, TaskId};
use crate::infrastructure::{RepositoryError, TaskRepository};

/// A `TaskRepository` whose every operation fails.
#[derive(Debug, Clone)]
pub struct UnavailableTaskRepository {
    reason: String,
}

impl UnavailableTaskRepository {
    /// Creates a repository that reports `reason` on every call.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> RepositoryError {
        RepositoryError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl TaskRepository for UnavailableTaskRepository {
    async fn create(&self, _title: &str) -> Result<Task, RepositoryError> {
        Err(self.unavailable())
    }

    async fn list_newest_first(&self) -> Result<Vec<Task>, RepositoryError> {
        Err(self.unavailable())
    }

    async fn find_by_id(&self, _id: &TaskId) -> Result<Option<Task>, RepositoryError> {
        Err(self.unavailable())
    }

    async fn update(
        &self,
        _id: &TaskId,
        _changes: &TaskChanges,
    ) -> Result<Option<Task>, RepositoryError> {
        Err(self.unavailable())
    }

    async fn delete(&self, _id: &TaskId) -> Result<Option<Task>, RepositoryError> {
        Err(self.unavailable())
    }
}
