//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware in request order
//! - Bind server to listener and shut down gracefully
//!
//! # Middleware Order (outermost first)
//! ```text
//! request id → trace → security headers → timeout → body limit
//!     → session → csrf issue → view locals → error handler
//!     → csrf validate → routes / fallback
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, http::StatusCode, middleware::from_fn_with_state, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AppConfig;
use crate::http::error::handle_errors;
use crate::http::request::{make_span, propagate_request_id, set_request_id};
use crate::http::routes::{self, not_found};
use crate::lifecycle::StartupError;
use crate::security::csrf::{issue_token, validate_token, CsrfSettings};
use crate::security::headers::{apply_security_headers, SecurityHeaderPolicy};
use crate::views::{set_locals, Views};

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub views: Arc<Views>,
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a server with the application routes.
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        Self::with_routes(config, routes::routes())
    }

    /// Create a server around the given routes.
    pub fn with_routes(config: AppConfig, routes: Router<AppState>) -> Result<Self, StartupError> {
        let state = AppState {
            config: Arc::new(config),
            views: Arc::new(Views::new()?),
        };

        let config = state.config.clone();
        let router = Self::build_router(state, routes)?;
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, routes: Router<AppState>) -> Result<Router, StartupError> {
        let config = state.config.clone();
        let csrf = CsrfSettings::from_config(&config);
        let security_headers = Arc::new(SecurityHeaderPolicy::default().to_header_map()?);

        let sessions = SessionManagerLayer::new(MemoryStore::default())
            .with_name(config.session.cookie_name.clone())
            .with_secure(config.is_production())
            .with_http_only(true)
            .with_same_site(SameSite::Strict)
            .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
                config.session.inactivity_secs,
            )));

        let edge = ServiceBuilder::new()
            .layer(set_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(propagate_request_id())
            .layer(from_fn_with_state(security_headers, apply_security_headers))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.limits.request_secs),
            ))
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes));

        let app = ServiceBuilder::new()
            .layer(sessions)
            .layer(from_fn_with_state(csrf.clone(), issue_token))
            .layer(from_fn_with_state(state.clone(), set_locals))
            .layer(from_fn_with_state(state.clone(), handle_errors))
            .layer(from_fn_with_state(csrf, validate_token));

        let router = routes
            .fallback(not_found)
            .layer(app)
            .layer(edge)
            .with_state(state);

        Ok(router)
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_url = %self.config.server.base_url,
            environment = ?self.config.server.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A handle to the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
