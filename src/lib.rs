//! Personal Task Tracker
//!
//! A small REST API over a task store, plus a typed controller for the
//! task list that talks to it.
//!
//! ## Modules
//!
//! - [`domain`]: task record and change set
//! - [`infrastructure`]: task store trait and its backends
//! - [`api`]: `/tasks` routes, DTOs and error responses
//! - [`server`]: listener configuration and graceful shutdown
//! - [`client`]: task board controller and HTTP gateway

#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod server;
