//! Task client: a typed controller for the task list and its HTTP gateway.

pub mod board;
pub mod gateway;

pub use board::{COMPLETE_ICON, EditKey, InlineEditor, Outcome, TaskBoard, TaskRow, UNDO_ICON};
pub use gateway::{GatewayError, HttpTaskGateway, TaskGateway};
