//! Task board controller.
//!
//! [`TaskBoard`] keeps the rendered rows of the task list and turns user
//! interactions into gateway calls. Rows only change after the server
//! confirms an action, and always take the server-returned values. Handlers
//! are addressed by task id and read the row's current state at call time.

use super::gateway::{GatewayError, TaskGateway};
use crate::api::TaskResponse;

/// Toggle icon for a task that is not completed yet.
pub const COMPLETE_ICON: &str = "✅";

/// Toggle icon for a completed task.
pub const UNDO_ICON: &str = "↩";

// =============================================================================
// Rows
// =============================================================================

/// An open inline title editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEditor {
    original: String,
}

impl InlineEditor {
    /// Title shown before editing started; restored on cancel.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }
}

/// One rendered task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub completed: bool,
    editor: Option<InlineEditor>,
}

impl TaskRow {
    #[must_use]
    pub fn toggle_icon(&self) -> &'static str {
        if self.completed { UNDO_ICON } else { COMPLETE_ICON }
    }

    #[must_use]
    pub const fn editor(&self) -> Option<&InlineEditor> {
        self.editor.as_ref()
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editor.is_some()
    }
}

impl From<TaskResponse> for TaskRow {
    fn from(task: TaskResponse) -> Self {
        Self {
            id: task.id,
            title: task.title,
            completed: task.completed,
            editor: None,
        }
    }
}

// =============================================================================
// Interaction Types
// =============================================================================

/// Keys the inline editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKey {
    /// Commit the typed text.
    Confirm(String),
    /// Abandon the edit.
    Cancel,
}

/// What a handler changed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do; no request was sent.
    Unchanged,
    /// The request failed; rows were left as they were.
    Failed,
    /// Rows were appended from the server list.
    Loaded(usize),
    /// A confirmed task was inserted at the top.
    Inserted(String),
    /// A row took the server-confirmed completion flag.
    Toggled { id: String, completed: bool },
    /// A row was removed after the server deleted it.
    Removed(String),
    /// An inline editor was opened.
    EditStarted(String),
    /// An inline editor was closed showing the original title.
    EditReverted(String),
    /// A row took the server-confirmed title.
    Renamed { id: String, title: String },
}

// =============================================================================
// Task Board
// =============================================================================

/// Task list controller over a [`TaskGateway`].
#[derive(Debug)]
pub struct TaskBoard<G> {
    gateway: G,
    rows: Vec<TaskRow>,
    input: String,
}

impl<G: TaskGateway> TaskBoard<G> {
    #[must_use]
    pub const fn new(gateway: G) -> Self {
        Self {
            gateway,
            rows: Vec::new(),
            input: String::new(),
        }
    }

    /// Rendered rows, top first.
    #[must_use]
    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, id: &str) -> Option<&TaskRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Current contents of the new-task input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetches the task list and appends its rows in server order.
    pub async fn load(&mut self) -> Outcome {
        match self.gateway.list().await {
            Ok(tasks) => {
                let count = tasks.len();
                self.rows.extend(tasks.into_iter().map(TaskRow::from));
                Outcome::Loaded(count)
            }
            Err(error) => failed("Failed to load tasks", &error),
        }
    }

    /// Creates a task from the input; the confirmed task goes on top.
    pub async fn submit(&mut self) -> Outcome {
        let title = self.input.trim().to_string();
        if title.is_empty() {
            return Outcome::Unchanged;
        }

        match self.gateway.create(&title).await {
            Ok(task) => {
                let row = TaskRow::from(task);
                let id = row.id.clone();
                self.rows.insert(0, row);
                self.input.clear();
                Outcome::Inserted(id)
            }
            Err(error) => failed("Failed to add task", &error),
        }
    }

    /// Requests the inverse of the row's current completion flag.
    pub async fn toggle(&mut self, id: &str) -> Outcome {
        let Some(requested) = self.row(id).map(|row| !row.completed) else {
            return Outcome::Unchanged;
        };

        match self.gateway.set_completed(id, requested).await {
            Ok(task) => {
                let completed = task.completed;
                if let Some(row) = self.row_mut(id) {
                    row.completed = completed;
                }
                Outcome::Toggled {
                    id: id.to_string(),
                    completed,
                }
            }
            Err(error) => failed("Error toggling task", &error),
        }
    }

    /// Deletes a task; the row disappears only after the server confirms.
    pub async fn remove(&mut self, id: &str) -> Outcome {
        if self.row(id).is_none() {
            return Outcome::Unchanged;
        }

        match self.gateway.delete(id).await {
            Ok(_) => {
                self.rows.retain(|row| row.id != id);
                Outcome::Removed(id.to_string())
            }
            Err(error) => failed("Failed to delete task", &error),
        }
    }

    /// Opens the inline editor on a row.
    pub fn start_edit(&mut self, id: &str) -> Outcome {
        match self.row_mut(id) {
            Some(row) if !row.is_editing() => {
                row.editor = Some(InlineEditor {
                    original: row.title.clone(),
                });
                Outcome::EditStarted(id.to_string())
            }
            _ => Outcome::Unchanged,
        }
    }

    /// Handles a key in an open inline editor.
    ///
    /// A blank or unchanged confirm reverts without a request. A failed rename
    /// keeps the editor open so the user can retry or cancel.
    pub async fn edit_key(&mut self, id: &str, key: EditKey) -> Outcome {
        let Some(original) = self
            .row(id)
            .and_then(TaskRow::editor)
            .map(|editor| editor.original.clone())
        else {
            return Outcome::Unchanged;
        };

        let title = match key {
            EditKey::Cancel => return self.close_editor(id),
            EditKey::Confirm(text) => text.trim().to_string(),
        };

        if title.is_empty() || title == original {
            return self.close_editor(id);
        }

        match self.gateway.rename(id, &title).await {
            Ok(task) => {
                if let Some(row) = self.row_mut(id) {
                    row.title.clone_from(&task.title);
                    row.editor = None;
                }
                Outcome::Renamed {
                    id: id.to_string(),
                    title: task.title,
                }
            }
            Err(error) => failed("Error updating task title", &error),
        }
    }

    fn close_editor(&mut self, id: &str) -> Outcome {
        if let Some(row) = self.row_mut(id) {
            row.editor = None;
        }
        Outcome::EditReverted(id.to_string())
    }

    fn row_mut(&mut self, id: &str) -> Option<&mut TaskRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }
}

fn failed(action: &str, error: &GatewayError) -> Outcome {
    tracing::error!(%error, "{action}");
    Outcome::Failed
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    // -------------------------------------------------------------------------
    // Fake gateway
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct FakeGateway {
        tasks: Mutex<Vec<TaskResponse>>,
        next_id: AtomicUsize,
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl FakeGateway {
        fn with_tasks(titles: &[(&str, bool)]) -> Self {
            let gateway = Self::default();
            {
                let mut tasks = gateway.tasks.lock().unwrap();
                for (title, completed) in titles {
                    let id = gateway.allocate_id();
                    tasks.push(task(&id, title, *completed));
                }
            }
            gateway
        }

        fn allocate_id(&self) -> String {
            format!("task-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        fn fail(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                Err(GatewayError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }

        fn modify(
            &self,
            id: &str,
            change: impl FnOnce(&mut TaskResponse),
        ) -> Result<TaskResponse, GatewayError> {
            self.check()?;
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(not_found)?;
            change(task);
            Ok(task.clone())
        }
    }

    fn not_found() -> GatewayError {
        GatewayError::Status {
            status: StatusCode::NOT_FOUND,
            message: "Task not found".to_string(),
        }
    }

    fn task(id: &str, title: &str, completed: bool) -> TaskResponse {
        TaskResponse {
            id: id.to_string(),
            title: title.to_string(),
            completed,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[async_trait]
    impl TaskGateway for FakeGateway {
        async fn list(&self) -> Result<Vec<TaskResponse>, GatewayError> {
            self.check()?;
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn create(&self, title: &str) -> Result<TaskResponse, GatewayError> {
            self.check()?;
            let created = task(&self.allocate_id(), title, false);
            self.tasks.lock().unwrap().insert(0, created.clone());
            Ok(created)
        }

        async fn set_completed(
            &self,
            id: &str,
            completed: bool,
        ) -> Result<TaskResponse, GatewayError> {
            self.modify(id, |task| task.completed = completed)
        }

        async fn rename(&self, id: &str, title: &str) -> Result<TaskResponse, GatewayError> {
            // Differs from the typed text so tests see which value the row shows.
            self.modify(id, |task| task.title = format!("{title} (saved)"))
        }

        async fn delete(&self, id: &str) -> Result<TaskResponse, GatewayError> {
            self.check()?;
            let mut tasks = self.tasks.lock().unwrap();
            let index = tasks
                .iter()
                .position(|task| task.id == id)
                .ok_or_else(not_found)?;
            Ok(tasks.remove(index))
        }
    }

    #[fixture]
    async fn loaded_board() -> TaskBoard<FakeGateway> {
        let mut board = TaskBoard::new(FakeGateway::with_tasks(&[
            ("Newest", false),
            ("Older", true),
        ]));
        board.load().await;
        board
    }

    // -------------------------------------------------------------------------
    // load
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn load_keeps_server_order(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let board = loaded_board.await;

        let titles: Vec<&str> = board.rows().iter().map(|row| row.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Older"]);
    }

    #[rstest]
    #[tokio::test]
    async fn load_failure_leaves_rows_empty() {
        let gateway = FakeGateway::with_tasks(&[("A", false)]);
        gateway.fail();
        let mut board = TaskBoard::new(gateway);

        assert_eq!(board.load().await, Outcome::Failed);
        assert!(board.rows().is_empty());
    }

    // -------------------------------------------------------------------------
    // submit
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn submit_inserts_confirmed_task_on_top(
        #[future] loaded_board: TaskBoard<FakeGateway>,
    ) {
        let mut board = loaded_board.await;
        board.set_input("  Buy milk  ");

        let outcome = board.submit().await;

        assert!(matches!(outcome, Outcome::Inserted(_)));
        assert_eq!(board.rows()[0].title, "Buy milk");
        assert!(!board.rows()[0].completed);
        assert_eq!(board.input(), "");
    }

    #[rstest]
    #[tokio::test]
    async fn submit_blank_input_sends_nothing() {
        let mut board = TaskBoard::new(FakeGateway::default());
        board.set_input("   ");

        assert_eq!(board.submit().await, Outcome::Unchanged);
        assert_eq!(board.gateway().calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn submit_failure_keeps_input_and_rows(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        board.gateway().fail();
        board.set_input("Buy milk");

        assert_eq!(board.submit().await, Outcome::Failed);
        assert_eq!(board.rows().len(), 2);
        assert_eq!(board.input(), "Buy milk");
    }

    // -------------------------------------------------------------------------
    // toggle
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn toggle_flips_to_server_value(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        let id = board.rows()[0].id.clone();
        assert_eq!(board.rows()[0].toggle_icon(), COMPLETE_ICON);

        let outcome = board.toggle(&id).await;

        assert_eq!(
            outcome,
            Outcome::Toggled {
                id: id.clone(),
                completed: true
            }
        );
        assert_eq!(board.row(&id).unwrap().toggle_icon(), UNDO_ICON);

        board.toggle(&id).await;
        assert!(!board.row(&id).unwrap().completed);
    }

    #[rstest]
    #[tokio::test]
    async fn toggle_failure_leaves_row(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        let id = board.rows()[1].id.clone();
        board.gateway().fail();

        assert_eq!(board.toggle(&id).await, Outcome::Failed);
        assert!(board.row(&id).unwrap().completed);
    }

    #[rstest]
    #[tokio::test]
    async fn toggle_unknown_row_sends_nothing() {
        let mut board = TaskBoard::new(FakeGateway::default());

        assert_eq!(board.toggle("missing").await, Outcome::Unchanged);
        assert_eq!(board.gateway().calls(), 0);
    }

    // -------------------------------------------------------------------------
    // remove
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn remove_drops_row_after_confirmation(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        let id = board.rows()[0].id.clone();

        assert_eq!(board.remove(&id).await, Outcome::Removed(id.clone()));
        assert!(board.row(&id).is_none());
        assert_eq!(board.rows().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_failure_keeps_row(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        let id = board.rows()[0].id.clone();
        board.gateway().fail();

        assert_eq!(board.remove(&id).await, Outcome::Failed);
        assert!(board.row(&id).is_some());
    }

    // -------------------------------------------------------------------------
    // inline edit
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn confirm_shows_server_title(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        let id = board.rows()[0].id.clone();
        assert_eq!(board.start_edit(&id), Outcome::EditStarted(id.clone()));

        let outcome = board
            .edit_key(&id, EditKey::Confirm(" Renamed ".to_string()))
            .await;

        assert_eq!(
            outcome,
            Outcome::Renamed {
                id: id.clone(),
                title: "Renamed (saved)".to_string()
            }
        );
        let row = board.row(&id).unwrap();
        assert_eq!(row.title, "Renamed (saved)");
        assert!(!row.is_editing());
    }

    #[rstest]
    #[case(EditKey::Cancel)]
    #[case(EditKey::Confirm("Newest".to_string()))]
    #[case(EditKey::Confirm("   ".to_string()))]
    #[tokio::test]
    async fn revert_keys_send_nothing(
        #[future] loaded_board: TaskBoard<FakeGateway>,
        #[case] key: EditKey,
    ) {
        let mut board = loaded_board.await;
        let id = board.rows()[0].id.clone();
        let calls = board.gateway().calls();
        board.start_edit(&id);

        assert_eq!(board.edit_key(&id, key).await, Outcome::EditReverted(id.clone()));

        let row = board.row(&id).unwrap();
        assert_eq!(row.title, "Newest");
        assert!(!row.is_editing());
        assert_eq!(board.gateway().calls(), calls);
    }

    #[rstest]
    #[tokio::test]
    async fn confirm_failure_keeps_editor_open(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        let id = board.rows()[0].id.clone();
        board.start_edit(&id);
        board.gateway().fail();

        let outcome = board
            .edit_key(&id, EditKey::Confirm("Renamed".to_string()))
            .await;

        assert_eq!(outcome, Outcome::Failed);
        let row = board.row(&id).unwrap();
        assert_eq!(row.title, "Newest");
        assert_eq!(row.editor().map(InlineEditor::original), Some("Newest"));
    }

    #[rstest]
    #[tokio::test]
    async fn edit_key_without_editor_is_ignored(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        let id = board.rows()[0].id.clone();

        assert_eq!(board.edit_key(&id, EditKey::Cancel).await, Outcome::Unchanged);
    }

    #[rstest]
    #[tokio::test]
    async fn start_edit_twice_is_ignored(#[future] loaded_board: TaskBoard<FakeGateway>) {
        let mut board = loaded_board.await;
        let id = board.rows()[0].id.clone();
        board.start_edit(&id);

        assert_eq!(board.start_edit(&id), Outcome::Unchanged);
    }
}
