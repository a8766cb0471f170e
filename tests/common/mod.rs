//! Common test helpers for integration tests.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate, and not every file uses every helper.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

use task_tracker::api::{AppState, create_router};
use task_tracker::infrastructure::UnavailableTaskRepository;

/// Body of the static page written into every test asset directory.
pub const INDEX_HTML: &str = "<!DOCTYPE html><title>Task Tracker</title>";

// =============================================================================
// Router Helpers
// =============================================================================

/// A router over `state` whose static directory lives as long as the returned guard.
pub fn create_test_router(state: AppState) -> (Router, TempDir) {
    let static_dir = tempfile::tempdir().expect("Failed to create static dir");
    std::fs::write(static_dir.path().join("index.html"), INDEX_HTML)
        .expect("Failed to write index.html");

    (create_router(state, static_dir.path()), static_dir)
}

/// An in-memory backed router.
pub fn create_in_memory_router() -> (Router, TempDir) {
    create_test_router(AppState::in_memory())
}

/// A router whose store fails every call, as after a failed database connection.
pub fn create_unavailable_router() -> (Router, TempDir) {
    create_test_router(AppState::new(Arc::new(UnavailableTaskRepository::new(
        "connection refused (password=hunter2)",
    ))))
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Raw response: status plus body bytes.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn error_message(&self) -> String {
        self.json()["error"]
            .as_str()
            .expect("Response has no error field")
            .to_string()
    }
}

/// Sends one request through the router.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec();

    TestResponse { status, body }
}

/// Creates a task through the API and returns its JSON.
pub async fn create_task(router: &Router, title: &str) -> Value {
    let body = serde_json::json!({ "title": title }).to_string();
    let response = send(router, Method::POST, "/tasks", Some(&body)).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.json()
}

// =============================================================================
// Live Server
// =============================================================================

/// Serves `state` on an ephemeral local port and returns the base URL.
pub async fn spawn_server(state: AppState) -> (String, TempDir) {
    let (router, static_dir) = create_test_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let address = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    (format!("http://{address}"), static_dir)
}
