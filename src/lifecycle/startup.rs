//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the server from a validated configuration
//! - Bind the listener on the configured port
//! - Wire OS signals to graceful shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and ends the process non-zero
//! - The listener binds last, after templates and headers are ready

use axum::http::header::InvalidHeaderValue;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{AppConfig, ConfigError};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};

/// Failures that prevent the application from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("templates: {0}")]
    Templates(#[from] tera::Error),

    #[error("security headers: {0}")]
    Headers(#[from] InvalidHeaderValue),

    #[error("no port configured")]
    MissingPort,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start serving and block until shutdown completes.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let port = config.server.port.ok_or(StartupError::MissingPort)?;
    let bind_address = format!("{}:{}", config.server.host, port);

    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");
    tracing::info!("Server running at http://localhost:{}", local_addr.port());
    tracing::info!("Press Ctrl-C to terminate...");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.notified();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
