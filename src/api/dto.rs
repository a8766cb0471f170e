//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies arrive as raw JSON values and are checked field by field
//! here, before any store call. Type mismatches become [`ValidationError`]s
//! instead of deserializer rejections, so every client error has the same shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ValidationError;
use crate::domain::{Task, TaskChanges};

const INVALID_JSON: &str = "Request body must be valid JSON";
const INVALID_CREATE: &str = "Title is required and must be a string";
const INVALID_COMPLETION: &str = "\"completed\" is required and must be a boolean";
const INVALID_FULL_UPDATE: &str =
    "Invalid data. \"title\" must be string, \"completed\" must be boolean.";
const EMPTY_TITLE: &str = "Title must not be empty";
const NO_VALID_FIELDS: &str = "No valid fields to update";

// =============================================================================
// Body Parsing
// =============================================================================

/// Parses a raw request body into a JSON object.
///
/// An empty body is an empty object. Valid JSON that is not an object is also
/// treated as an object without fields, so it fails field validation.
///
/// # Errors
///
/// Returns `ValidationError` if the body is not valid JSON.
pub fn parse_body(body: &str) -> Result<Map<String, Value>, ValidationError> {
    if body.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Ok(Map::new()),
        Err(_) => Err(ValidationError::new(INVALID_JSON)),
    }
}

/// Returns the title as sent if `value` is a JSON string with visible text.
fn non_blank_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|title| !title.trim().is_empty())
        .map(str::to_string)
}

// =============================================================================
// Request DTOs
// =============================================================================

/// Validated body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    /// Title as sent; never blank.
    pub title: String,
}

impl CreateTaskRequest {
    /// Validates a create payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `title` is missing, not a string, or blank.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        non_blank_string(fields.get("title"))
            .map(|title| Self { title })
            .ok_or_else(|| ValidationError::new(INVALID_CREATE))
    }
}

/// Validated body of `PUT /tasks/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRequest {
    /// New completion flag.
    pub completed: bool,
}

impl CompletionRequest {
    /// Validates a completion payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `completed` is missing or not a boolean.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        fields
            .get("completed")
            .and_then(Value::as_bool)
            .map(|completed| Self { completed })
            .ok_or_else(|| ValidationError::new(INVALID_COMPLETION))
    }

    /// Converts into store changes.
    #[must_use]
    pub const fn into_changes(self) -> TaskChanges {
        TaskChanges::completion(self.completed)
    }
}

/// Validated body of `PUT /tasks/{id}/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullUpdateRequest {
    /// Title as sent; never blank.
    pub title: String,
    /// New completion flag.
    pub completed: bool,
}

impl FullUpdateRequest {
    /// Validates a full-update payload. Both fields are required.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if either field is missing or wrongly typed,
    /// or if the title is blank.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let title = fields.get("title").and_then(Value::as_str);
        let completed = fields.get("completed").and_then(Value::as_bool);

        let (Some(title), Some(completed)) = (title, completed) else {
            return Err(ValidationError::new(INVALID_FULL_UPDATE));
        };

        if title.trim().is_empty() {
            return Err(ValidationError::new(EMPTY_TITLE));
        }

        Ok(Self {
            title: title.to_string(),
            completed,
        })
    }

    /// Converts into store changes.
    #[must_use]
    pub fn into_changes(self) -> TaskChanges {
        TaskChanges::replace(self.title, self.completed)
    }
}

/// Validated body of `PATCH /tasks/{id}`.
///
/// Wrongly typed fields are dropped; at least one field must survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialUpdateRequest {
    /// New title, if a string was supplied.
    pub title: Option<String>,
    /// New completion flag, if a boolean was supplied.
    pub completed: Option<bool>,
}

impl PartialUpdateRequest {
    /// Validates a partial-update payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if neither field is usable, or if a string
    /// title is blank.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let title = match fields.get("title").and_then(Value::as_str) {
            Some(title) if title.trim().is_empty() => {
                return Err(ValidationError::new(EMPTY_TITLE));
            }
            Some(title) => Some(title.to_string()),
            None => None,
        };
        let completed = fields.get("completed").and_then(Value::as_bool);

        if title.is_none() && completed.is_none() {
            return Err(ValidationError::new(NO_VALID_FIELDS));
        }

        Ok(Self { title, completed })
    }

    /// Converts into store changes.
    #[must_use]
    pub fn into_changes(self) -> TaskChanges {
        TaskChanges {
            title: self.title,
            completed: self.completed,
        }
    }
}

// =============================================================================
// Response DTOs
// =============================================================================

/// Response DTO for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Task ID.
    pub id: String,
    /// Title of the task.
    pub title: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            completed: task.completed,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

/// Response DTO for `DELETE /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    /// Confirmation message.
    pub message: String,
    /// The removed task.
    pub task: TaskResponse,
}

impl DeleteTaskResponse {
    /// Builds the confirmation for a removed task.
    #[must_use]
    pub fn deleted(task: &Task) -> Self {
        Self {
            message: "Task deleted successfully".to_string(),
            task: TaskResponse::from(task),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
