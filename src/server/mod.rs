//! HTTP server lifecycle: address configuration, binding and graceful shutdown.

use std::env;
use std::path::PathBuf;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;

// =============================================================================
// Configuration
// =============================================================================

/// Listener and static asset configuration.
///
/// # Environment Variables
///
/// - `HOST`: bind address (default: `0.0.0.0`)
/// - `PORT`: bind port (default: `3000`)
/// - `STATIC_DIR`: directory served for non-API paths (default: `public`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub static_dir: PathBuf,
}

impl ServerConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration from an arbitrary key lookup.
    ///
    /// Unparseable ports fall back to the default.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST")
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "Invalid PORT, using default");
                defaults.port
            }),
            None => defaults.port,
        };

        let static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or(defaults.static_dir, PathBuf::from);

        Self {
            host,
            port,
            static_dir,
        }
    }

    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

// =============================================================================
// Server
// =============================================================================

pub struct Server {
    config: ServerConfig,
}

impl Server {
    #[must_use]
    pub const fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Binds the listener and serves `router` until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn run(self, router: Router) -> anyhow::Result<()> {
        let address = self.config.socket_addr();

        let listener = TcpListener::bind(&address).await?;

        match listener.local_addr() {
            Ok(local) => tracing::info!("Server listening on {}", local),
            Err(error) => tracing::warn!(%error, "Could not determine local address"),
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

// =============================================================================
// Shutdown Signal
// =============================================================================

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
