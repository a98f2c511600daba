//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the application.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::forms::ValidationSchema;

/// Root configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener and deployment settings.
    pub server: ServerConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// CSRF protection settings.
    pub csrf: CsrfConfig,

    /// Request limits and timeouts.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Per-field length bounds used when formatting validation errors.
    pub schema: ValidationSchema,
}

impl AppConfig {
    /// Whether production behavior (secure cookies, generic error pages) is enabled.
    pub fn is_production(&self) -> bool {
        self.server.environment.is_production()
    }
}

/// Deployment environment, taken from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything other than the literal `production` is treated as development.
    pub fn from_node_env(value: &str) -> Self {
        if value == "production" {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Listener and deployment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind on.
    pub host: String,

    /// Port to listen on. Has no default; startup fails without one.
    pub port: Option<u16>,

    /// Mount point of the application, exposed to views as `base_url`.
    pub base_url: String,

    /// Deployment environment.
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: None,
            base_url: "/".to_string(),
            environment: Environment::Development,
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the session ID cookie.
    pub cookie_name: String,

    /// Session expiry after this many seconds of inactivity.
    pub inactivity_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "snippet.sid".to_string(),
            inactivity_secs: 60 * 60 * 24,
        }
    }
}

/// CSRF protection configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Reject mutating requests that carry no `_csrf` field or `X-XSRF-TOKEN`
    /// header instead of falling back to the cookie value.
    pub require_submitted_token: bool,
}

/// Request limits and timeouts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Total time allowed for a request in seconds.
    pub request_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter, used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "snippet_web=info,tower_http=debug".to_string(),
        }
    }
}
