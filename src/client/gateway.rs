//! Network seam between the task board and the task API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::api::{ApiError, DeleteTaskResponse, TaskResponse};

// =============================================================================
// Gateway Error
// =============================================================================

/// Error type for gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a readable response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server responded {status}: {message}")]
    Status {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// The server's `error` text, or the status reason if absent.
        message: String,
    },
}

// =============================================================================
// Task Gateway Trait
// =============================================================================

/// Task API calls issued by the board, one per user interaction.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Fetches all tasks in server order.
    async fn list(&self) -> Result<Vec<TaskResponse>, GatewayError>;

    /// Creates a task with the given title.
    async fn create(&self, title: &str) -> Result<TaskResponse, GatewayError>;

    /// Replaces the completion flag of a task.
    async fn set_completed(&self, id: &str, completed: bool)
    -> Result<TaskResponse, GatewayError>;

    /// Renames a task.
    async fn rename(&self, id: &str, title: &str) -> Result<TaskResponse, GatewayError>;

    /// Deletes a task, returning the removed record.
    async fn delete(&self, id: &str) -> Result<TaskResponse, GatewayError>;
}

// =============================================================================
// HTTP Gateway
// =============================================================================

/// [`TaskGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskGateway {
    base_url: String,
    client: Client,
}

impl HttpTaskGateway {
    /// Creates a gateway for the API served at `base_url` (e.g. `http://127.0.0.1:3000`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Creates a gateway sharing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/tasks/{id}", self.base_url)
    }
}

#[async_trait]
impl TaskGateway for HttpTaskGateway {
    async fn list(&self) -> Result<Vec<TaskResponse>, GatewayError> {
        execute(self.client.get(self.tasks_url())).await
    }

    async fn create(&self, title: &str) -> Result<TaskResponse, GatewayError> {
        execute(
            self.client
                .post(self.tasks_url())
                .json(&json!({ "title": title })),
        )
        .await
    }

    async fn set_completed(
        &self,
        id: &str,
        completed: bool,
    ) -> Result<TaskResponse, GatewayError> {
        execute(
            self.client
                .put(self.task_url(id))
                .json(&json!({ "completed": completed })),
        )
        .await
    }

    async fn rename(&self, id: &str, title: &str) -> Result<TaskResponse, GatewayError> {
        execute(
            self.client
                .patch(self.task_url(id))
                .json(&json!({ "title": title })),
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<TaskResponse, GatewayError> {
        let response: DeleteTaskResponse = execute(self.client.delete(self.task_url(id))).await?;
        Ok(response.task)
    }
}

/// Sends a request and decodes a success body, or the server's error text.
async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, GatewayError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ApiError>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    Err(GatewayError::Status { status, message })
}
