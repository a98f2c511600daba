//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (BASE_URL, PORT, NODE_ENV)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc in AppState
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields except the port have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, CsrfConfig, Environment, LimitsConfig, ObservabilityConfig, ServerConfig,
    SessionConfig,
};
pub use validation::ValidationError;
