//! Domain module for task tracking.
//!
//! This module contains the Task Record and the value objects it is built from.

pub mod task;

pub use task::{Task, TaskChanges, TaskId, Timestamp};
