//! API module for HTTP handlers.
//!
//! This module contains the route table, request/response DTOs and handlers
//! for the `/tasks` resource.

pub mod dto;
pub mod error;
pub mod handlers;

use std::path::Path;

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use dto::{
    CompletionRequest, CreateTaskRequest, DeleteTaskResponse, FullUpdateRequest,
    PartialUpdateRequest, TaskResponse, parse_body,
};
pub use error::{ApiError, ApiErrorResponse, ValidationError};
pub use handlers::{
    AppState, HealthResponse, create_task, delete_task, full_update, health_check, list_tasks,
    partial_update, replace_completion, welcome,
};

/// Builds the application router.
///
/// API routes take precedence; every other path is served from `static_dir`.
/// `GET /` is the API welcome text, so the browser client lives at `/index.html`.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            put(replace_completion)
                .patch(partial_update)
                .delete(delete_task),
        )
        .route("/tasks/{id}/edit", put(full_update))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// Permissive CORS so the browser client may be hosted elsewhere.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
