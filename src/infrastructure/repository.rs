//! Task store trait.
//!
//! The task store owns every persisted [`Task`]. It exposes exactly the five
//! operations the HTTP layer needs; "not found" is reported as `None`, never as
//! an error, so callers can tell a missing record apart from a failing store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Task, TaskChanges, TaskId};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during task store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The database rejected or failed the operation.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// No database connection was established at startup.
    #[error("Task store unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Task Repository
// =============================================================================

/// Repository trait for Task records.
///
/// Implementations assign identifiers and timestamps; callers never construct
/// a persisted task themselves.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates a task with the given title and `completed = false`.
    async fn create(&self, title: &str) -> Result<Task, RepositoryError>;

    /// Lists every task, most recently created first.
    async fn list_newest_first(&self) -> Result<Vec<Task>, RepositoryError>;

    /// Finds a task by its ID.
    ///
    /// Returns `Ok(Some(task))` if found, `Ok(None)` if not found,
    /// or an error if the operation fails.
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError>;

    /// Applies `changes` to the task and returns the updated record.
    ///
    /// Returns `Ok(None)` if no task has this ID.
    async fn update(
        &self,
        id: &TaskId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, RepositoryError>;

    /// Removes a task permanently and returns the removed record.
    ///
    /// Returns `Ok(None)` if no task has this ID.
    async fn delete(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError>;
}

/// Sorts tasks newest-created first.
///
/// Ties on `created_at` fall back to the id, which is time-ordered as well.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right.id.cmp(&left.id))
    });
}

// =============================================================================
// Tests
// =============================================================================
