//! Repository factory for runtime backend selection.
//!
//! This module creates the task store named by the environment. A database
//! that cannot be reached is not fatal: the failure is logged and the factory
//! hands out an [`UnavailableTaskRepository`] so the HTTP listener still starts.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `postgres` (default) | `in_memory`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (used when `STORAGE_MODE=postgres`)
//!
//! # Example
//!
//! ```ignore
//! use task_tracker::infrastructure::{RepositoryConfig, RepositoryFactory};
//!
//! let config = RepositoryConfig::from_env()?;
//! let task_repository = RepositoryFactory::new(config).create_or_unavailable().await;
//! ```

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use super::{
    InMemoryTaskRepository, PostgresTaskRepository, TaskRepository, UnavailableTaskRepository,
};

// =============================================================================
// Configuration Types
// =============================================================================

/// Storage mode for tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// `PostgreSQL` storage, the production backend.
    #[default]
    Postgres,
    /// In-memory storage. Tasks are lost on restart.
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    /// Parses a storage mode from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidStorageMode` if the string is not recognized.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(ConfigurationError::InvalidStorageMode(value.to_string())),
        }
    }
}

/// Configuration for the repository factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Storage backend for tasks.
    pub storage_mode: StorageMode,
    /// `PostgreSQL` connection URL.
    pub database_url: Option<String>,
}

impl RepositoryConfig {
    /// Creates a configuration from environment variables.
    ///
    /// A missing `DATABASE_URL` is not a configuration error; it surfaces as a
    /// connection failure when the repository is created.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidStorageMode` if `STORAGE_MODE` is not recognized.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidStorageMode` if `STORAGE_MODE` is not recognized.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_mode = match lookup("STORAGE_MODE") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => StorageMode::default(),
        };

        // Empty/whitespace-only URLs count as missing
        let database_url = lookup("DATABASE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            storage_mode,
            database_url,
        })
    }

    /// Returns an in-memory configuration.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self {
            storage_mode: StorageMode::InMemory,
            database_url: None,
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Invalid storage mode value.
    #[error("Invalid storage mode: '{0}'. Expected 'in_memory' or 'postgres'")]
    InvalidStorageMode(String),
}

/// Errors that can occur during repository creation.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// `DATABASE_URL` is not set in postgres mode.
    #[error("DATABASE_URL environment variable is required when STORAGE_MODE=postgres")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    /// Schema creation failed on a reachable database.
    #[error("Schema setup error: {0}")]
    SchemaSetup(String),
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Factory for creating the task repository named by the configuration.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    config: RepositoryConfig,
}

impl RepositoryFactory {
    /// Creates a new repository factory with the given configuration.
    #[must_use]
    pub const fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Creates the task repository.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError` if the database URL is missing, the connection
    /// fails, or the schema cannot be created.
    pub async fn create(&self) -> Result<Arc<dyn TaskRepository>, FactoryError> {
        match self.config.storage_mode {
            StorageMode::InMemory => Ok(Arc::new(InMemoryTaskRepository::new())),
            StorageMode::Postgres => {
                let pool = self.create_postgres_pool().await?;
                let repository = PostgresTaskRepository::new(pool);
                repository
                    .ensure_schema()
                    .await
                    .map_err(|error| FactoryError::SchemaSetup(error.to_string()))?;
                Ok(Arc::new(repository))
            }
        }
    }

    /// Creates the task repository, falling back to an unavailable store.
    ///
    /// The failure is logged once here; afterwards every store call reports it.
    pub async fn create_or_unavailable(&self) -> Arc<dyn TaskRepository> {
        match self.create().await {
            Ok(repository) => {
                tracing::info!(storage_mode = ?self.config.storage_mode, "Task store connected");
                repository
            }
            Err(error) => {
                tracing::error!(%error, "Failed to connect task store; serving without storage");
                Arc::new(UnavailableTaskRepository::new(error.to_string()))
            }
        }
    }

    async fn create_postgres_pool(&self) -> Result<PgPool, FactoryError> {
        let database_url = self
            .config
            .database_url
            .as_ref()
            .ok_or(FactoryError::MissingDatabaseUrl)?;

        PgPool::connect(database_url)
            .await
            .map_err(|error| FactoryError::DatabaseConnection(error.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
