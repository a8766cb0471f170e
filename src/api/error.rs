//! API error handling.
//!
//! Three error kinds reach clients and are never conflated:
//! validation failures (400), unknown ids (404) and store failures (500).
//! Every error body is a JSON object with a single `error` text field.

use axum::{
    Json,
    extract::rejection::{PathRejection, StringRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::RepositoryError;

// =============================================================================
// API Error
// =============================================================================

/// API error structure for JSON responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// Creates a new API error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// API error response containing status code and error body.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a new API error response.
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new(message))
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new(message))
    }

    /// Creates the 404 response for an id absent from the store.
    #[must_use]
    pub fn task_not_found() -> Self {
        Self::not_found("Task not found")
    }

    /// Creates a 500 Internal Server Error response.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(message))
    }

    /// Logs a store failure and hides it behind a per-operation message.
    #[must_use]
    pub fn persistence(error: &RepositoryError, message: &'static str) -> Self {
        tracing::error!(%error, "{message}");
        Self::internal_error(message)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

// =============================================================================
// Extractor Rejections
// =============================================================================

/// A body that could not be read as text keeps its status (400, or 413 when
/// too large) but answers in the JSON error shape.
impl From<StringRejection> for ApiErrorResponse {
    fn from(rejection: StringRejection) -> Self {
        Self::new(rejection.status(), ApiError::new(rejection.body_text()))
    }
}

/// A path id that cannot be decoded can never name a stored task.
impl From<PathRejection> for ApiErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(%rejection, "Undecodable task id");
        Self::task_not_found()
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A request payload that failed shape validation.
///
/// Produced before any store access; always a 400 and never logged as a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Message returned to the client.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        Self::bad_request(error.message)
    }
}

// =============================================================================
// Tests
// =============================================================================
