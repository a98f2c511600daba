//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, tracing span)
//!     → routes.rs (pages, 404 fallback)
//!     → error.rs (AppError → flash + redirect, or error page)
//!     → response.rs (redirect helpers)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use error::AppError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
