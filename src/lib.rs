//! HTTP middleware layer for a server-rendered snippet application:
//! CSRF protection, security headers, centralized error rendering, and
//! session/view wiring on top of Axum.

pub mod config;
pub mod forms;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod views;

pub use config::AppConfig;
pub use http::{AppError, HttpServer};
pub use lifecycle::Shutdown;
