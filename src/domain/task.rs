//! Task domain model.
//!
//! A [`Task`] is the persisted unit representing one to-do item. Identifiers and
//! timestamps are assigned by the task store; this module only models them and
//! the pure transitions applied on update.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for a task.
///
/// This is a newtype wrapper around UUID to provide type safety. Identifiers
/// are time-ordered (v7), so comparing two ids also compares their creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generates a new time-ordered `TaskId` (UUID v7).
    ///
    /// **Note**: This is an impure function (side effect: time + random).
    /// Only task stores call it.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// A timestamp wrapper for `DateTime<Utc>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the current time as a `Timestamp`.
    ///
    /// **Note**: This is an impure function (side effect: system clock).
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Formats the timestamp as RFC 3339 with millisecond precision.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.to_rfc3339())
    }
}

// =============================================================================
// Task Record
// =============================================================================

/// A persisted to-do item.
///
/// `id` and `created_at` never change after creation; `updated_at` is refreshed
/// by every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Display text, never empty.
    pub title: String,
    /// Completion flag, `false` at creation.
    pub completed: bool,
    /// Creation time.
    pub created_at: Timestamp,
    /// Time of the last mutation.
    pub updated_at: Timestamp,
}

impl Task {
    /// Creates a freshly created, not yet completed task.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a set of field changes, refreshing `updated_at`.
    ///
    /// This is a pure function; the timestamp is passed in by the caller.
    #[must_use]
    pub fn apply(self, changes: &TaskChanges, now: Timestamp) -> Self {
        Self {
            title: changes.title.clone().unwrap_or(self.title),
            completed: changes.completed.unwrap_or(self.completed),
            updated_at: now,
            ..self
        }
    }
}

/// Field changes for an update-by-id store call.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// New title, if any.
    pub title: Option<String>,
    /// New completion flag, if any.
    pub completed: Option<bool>,
}

impl TaskChanges {
    /// Changes that only replace the completion flag.
    #[must_use]
    pub const fn completion(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Changes that only replace the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    /// Changes that replace both fields.
    #[must_use]
    pub fn replace(title: impl Into<String>, completed: bool) -> Self {
        Self {
            title: Some(title.into()),
            completed: Some(completed),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
