//! HTTP handlers for the task API.
//!
//! Each handler validates its payload first, performs exactly one store call,
//! and maps the outcome to a status code. Handlers share nothing but the
//! injected [`AppState`], so concurrent requests never coordinate in-process.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{PathRejection, StringRejection},
    },
    http::StatusCode,
};
use serde::Serialize;

use super::dto::{
    CompletionRequest, CreateTaskRequest, DeleteTaskResponse, FullUpdateRequest,
    PartialUpdateRequest, TaskResponse, parse_body,
};
use super::error::ApiErrorResponse;
use crate::domain::{TaskChanges, TaskId};
use crate::infrastructure::{InMemoryTaskRepository, TaskRepository};

// =============================================================================
// Application State
// =============================================================================

/// Process-wide dependencies injected into every handler.
///
/// Built once at startup; holds the task store as a trait object so the
/// backend is chosen at runtime.
#[derive(Clone)]
pub struct AppState {
    /// Task store.
    pub task_repository: Arc<dyn TaskRepository>,
}

impl AppState {
    /// Creates a new `AppState` around an initialized task store.
    #[must_use]
    pub fn new(task_repository: Arc<dyn TaskRepository>) -> Self {
        Self { task_repository }
    }

    /// Creates an `AppState` backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTaskRepository::new()))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppState")
            .field("task_repository", &"Arc<dyn TaskRepository>")
            .finish()
    }
}

// =============================================================================
// GET /tasks
// =============================================================================

/// Lists every task, most recently created first.
///
/// # Response
///
/// - **200 OK**: array of tasks
/// - **500 Internal Server Error**: store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] if the store call fails.
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let tasks = state
        .task_repository
        .list_newest_first()
        .await
        .map_err(|error| ApiErrorResponse::persistence(&error, "Failed to fetch tasks"))?;

    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

// =============================================================================
// POST /tasks
// =============================================================================

/// Creates a new task.
///
/// # Request Body
///
/// ```json
/// { "title": "Buy milk" }
/// ```
///
/// # Response
///
/// - **201 Created**: the new task, `completed` is `false`
/// - **400 Bad Request**: missing, non-string or blank title
/// - **500 Internal Server Error**: store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] on validation or store failure.
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let request = CreateTaskRequest::from_fields(&parse_body(&body?)?)?;

    let task = state
        .task_repository
        .create(&request.title)
        .await
        .map_err(|error| ApiErrorResponse::persistence(&error, "Failed to create task"))?;

    tracing::info!(task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

// =============================================================================
// PUT /tasks/{id}
// =============================================================================

/// Replaces a task's completion flag.
///
/// # Request Body
///
/// ```json
/// { "completed": true }
/// ```
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] with 400 for a non-boolean `completed`,
/// 404 for an unknown id and 500 for a store failure.
pub async fn replace_completion(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<String, StringRejection>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let request = CompletionRequest::from_fields(&parse_body(&body?)?)?;
    let Path(id) = id?;

    update_task(&state, &id, &request.into_changes(), "Failed to update task").await
}

// =============================================================================
// PUT /tasks/{id}/edit
// =============================================================================

/// Replaces both the title and the completion flag.
///
/// # Request Body
///
/// ```json
/// { "title": "Buy oat milk", "completed": false }
/// ```
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] with 400 if either field is missing or
/// wrongly typed, 404 for an unknown id and 500 for a store failure.
pub async fn full_update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<String, StringRejection>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let request = FullUpdateRequest::from_fields(&parse_body(&body?)?)?;
    let Path(id) = id?;

    update_task(
        &state,
        &id,
        &request.into_changes(),
        "Failed to fully update task",
    )
    .await
}

// =============================================================================
// PATCH /tasks/{id}
// =============================================================================

/// Updates the title, the completion flag, or both.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] with 400 if no usable field is present,
/// 404 for an unknown id and 500 for a store failure.
pub async fn partial_update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<String, StringRejection>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let request = PartialUpdateRequest::from_fields(&parse_body(&body?)?)?;
    let Path(id) = id?;

    update_task(
        &state,
        &id,
        &request.into_changes(),
        "Failed to partially update task",
    )
    .await
}

// =============================================================================
// DELETE /tasks/{id}
// =============================================================================

/// Deletes a task permanently.
///
/// # Response
///
/// ```json
/// { "message": "Task deleted successfully", "task": { ... } }
/// ```
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] with 404 for an unknown id and 500 for a
/// store failure.
pub async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteTaskResponse>, ApiErrorResponse> {
    let Path(id) = id?;
    let task_id = parse_task_id(&id)?;

    let task = state
        .task_repository
        .delete(&task_id)
        .await
        .map_err(|error| ApiErrorResponse::persistence(&error, "Failed to delete task"))?
        .ok_or_else(ApiErrorResponse::task_not_found)?;

    tracing::info!(task_id = %task.id, "Task deleted");

    Ok(Json(DeleteTaskResponse::deleted(&task)))
}

// =============================================================================
// GET / and GET /health
// =============================================================================

/// Plain-text greeting for the root path.
pub async fn welcome() -> &'static str {
    "Welcome to the Personal Task Manager API"
}

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// Reports the process as alive; it does not probe the task store.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Parses a path id. Ids that cannot exist in the store are reported as not found.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiErrorResponse> {
    raw.parse().map_err(|_| ApiErrorResponse::task_not_found())
}

async fn update_task(
    state: &AppState,
    raw_id: &str,
    changes: &TaskChanges,
    failure_message: &'static str,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let task_id = parse_task_id(raw_id)?;

    let task = state
        .task_repository
        .update(&task_id, changes)
        .await
        .map_err(|error| ApiErrorResponse::persistence(&error, failure_message))?
        .ok_or_else(ApiErrorResponse::task_not_found)?;

    tracing::debug!(task_id = %task.id, completed = task.completed, "Task updated");

    Ok(Json(TaskResponse::from(&task)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::UnavailableTaskRepository;
    use rstest::rstest;

    fn unavailable_state() -> AppState {
        AppState::new(Arc::new(UnavailableTaskRepository::new("no database")))
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_returns_created() {
        let state = AppState::in_memory();

        let (status, Json(task)) =
            create_task(State(state.clone()), Ok(r#"{"title":"Buy milk"}"#.to_string()))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_validation_skips_store() {
        // The unavailable store would answer 500 if it were reached.
        let error = create_task(State(unavailable_state()), Ok(r#"{"title":7}"#.to_string()))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[tokio::test]
    async fn test_list_tasks_store_failure_is_generic() {
        let error = list_tasks(State(unavailable_state())).await.unwrap_err();

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error.error, "Failed to fetch tasks");
    }

    #[rstest]
    #[tokio::test]
    async fn test_replace_completion_unknown_id() {
        let error = replace_completion(
            State(AppState::in_memory()),
            Ok(Path(TaskId::generate().to_string())),
            Ok(r#"{"completed":true}"#.to_string()),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let error = delete_task(State(AppState::in_memory()), Ok(Path("abc".to_string())))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.error.error, "Task not found");
    }

    #[rstest]
    #[tokio::test]
    async fn test_partial_update_validates_before_id() {
        let error = partial_update(
            State(AppState::in_memory()),
            Ok(Path("abc".to_string())),
            Ok("{}".to_string()),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[tokio::test]
    async fn test_full_update_store_failure_message() {
        let error = full_update(
            State(unavailable_state()),
            Ok(Path(TaskId::generate().to_string())),
            Ok(r#"{"title":"x","completed":false}"#.to_string()),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error.error, "Failed to fully update task");
    }

    #[rstest]
    #[tokio::test]
    async fn test_welcome_text() {
        assert_eq!(welcome().await, "Welcome to the Personal Task Manager API");
    }

    #[rstest]
    #[tokio::test]
    async fn test_health_check() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "healthy");
    }
}
