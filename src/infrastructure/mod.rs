//! Infrastructure module for task persistence.
//!
//! This module contains the task store trait, its backends, and the factory
//! that picks a backend from configuration.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod repository;
pub mod unavailable;

pub use factory::{
    ConfigurationError, FactoryError, RepositoryConfig, RepositoryFactory, StorageMode,
};
pub use in_memory::InMemoryTaskRepository;
pub use postgres::PostgresTaskRepository;
pub use repository::{RepositoryError, TaskRepository, sort_newest_first};
pub use unavailable::UnavailableTaskRepository;
