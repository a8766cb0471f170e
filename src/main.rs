//! Personal Task Tracker server.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `postgres` (default) | `in_memory`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (used when `STORAGE_MODE=postgres`)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `task_tracker=debug`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `3000`)
//! - `STATIC_DIR`: Client asset directory (default: `public`)

use task_tracker::api::{AppState, create_router};
use task_tracker::infrastructure::{RepositoryConfig, RepositoryFactory};
use task_tracker::server::{Server, ServerConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies.
    let dotenv = dotenvy::dotenv();

    init_tracing();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    tracing::info!("Starting Personal Task Tracker");

    let repository_config = RepositoryConfig::from_env()?;
    let server_config = ServerConfig::from_env();

    tracing::info!(
        storage_mode = ?repository_config.storage_mode,
        static_dir = %server_config.static_dir.display(),
        "Configuration loaded"
    );

    tracing::info!(
        "Browser client served at /index.html; GET / answers with the API welcome text"
    );

    // Store failures are logged and served as 500s; the listener starts regardless.
    let task_repository = RepositoryFactory::new(repository_config)
        .create_or_unavailable()
        .await;

    let router = create_router(AppState::new(task_repository), &server_config.static_dir);

    Server::new(server_config).run(router).await
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("task_tracker=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();
}
