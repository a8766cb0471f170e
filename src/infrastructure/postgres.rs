//! `PostgreSQL` task store.
//!
//! Uses `sqlx` with a connection pool. Every mutating statement returns the
//! affected row with `RETURNING`, so update and delete are a single round trip
//! and report "not found" as an empty result.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS tasks (
//!     id UUID PRIMARY KEY,
//!     title TEXT NOT NULL,
//!     completed BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks (created_at DESC);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Task, TaskChanges, TaskId, Timestamp};
use crate::infrastructure::{RepositoryError, TaskRepository};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks (created_at DESC)";

const TASK_COLUMNS: &str = "id, title, completed, created_at, updated_at";

/// Row shape returned by every task query.
type TaskRow = (Uuid, String, bool, DateTime<Utc>, DateTime<Utc>);

fn task_from_row((id, title, completed, created_at, updated_at): TaskRow) -> Task {
    Task {
        id: TaskId::from_uuid(id),
        title,
        completed,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    }
}

fn database_error(error: &sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

/// `PostgreSQL` implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// let pool = PgPool::connect("postgres://localhost/tasks").await?;
/// let repository = PostgresTaskRepository::new(pool);
/// repository.ensure_schema().await?;
/// let task = repository.create("Buy milk").await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new `PostgreSQL` task repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `tasks` table and its ordering index if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DatabaseError` if either statement fails.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;
        sqlx::query(CREATE_INDEX)
            .execute(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, title: &str) -> Result<Task, RepositoryError> {
        let id = TaskId::generate();
        let now = Timestamp::now();
        let sql = format!(
            "INSERT INTO tasks (id, title, completed, created_at, updated_at) \
             VALUES ($1, $2, FALSE, $3, $3) RETURNING {TASK_COLUMNS}"
        );

        let row: TaskRow = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .bind(title)
            .bind(now.as_datetime())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;

        Ok(task_from_row(row))
    }

    async fn list_newest_first(&self) -> Result<Vec<Task>, RepositoryError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC");

        let rows: Vec<TaskRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;

        Ok(rows.into_iter().map(task_from_row).collect())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        let row: Option<TaskRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;

        Ok(row.map(task_from_row))
    }

    async fn update(
        &self,
        id: &TaskId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, RepositoryError> {
        let now = Timestamp::now();
        let sql = format!(
            "UPDATE tasks SET \
                 title = COALESCE($2, title), \
                 completed = COALESCE($3, completed), \
                 updated_at = $4 \
             WHERE id = $1 RETURNING {TASK_COLUMNS}"
        );

        let row: Option<TaskRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .bind(changes.title.as_deref())
            .bind(changes.completed)
            .bind(now.as_datetime())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;

        Ok(row.map(task_from_row))
    }

    async fn delete(&self, id: &TaskId) -> Result<Option<Task>, RepositoryError> {
        let sql = format!("DELETE FROM tasks WHERE id = $1 RETURNING {TASK_COLUMNS}");

        let row: Option<TaskRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;

        Ok(row.map(task_from_row))
    }
}

// =============================================================================
// Tests
// =============================================================================
