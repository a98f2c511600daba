//! Configuration validation.
//!
//! Serde handles the syntactic side; this module checks value ranges and
//! cross-field consistency. Every violation is reported, not just the first.

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::forms::Field;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no port configured (set PORT)")]
    MissingPort,

    #[error("port must be non-zero")]
    ZeroPort,

    #[error("base_url must start with '/', got {0:?}")]
    RelativeBaseUrl(String),

    #[error("{field}: min_length {min} exceeds max_length {max}")]
    InvertedBounds { field: Field, min: usize, max: usize },

    #[error("session.inactivity_secs must be positive, got {0}")]
    NonPositiveSessionExpiry(i64),

    #[error("limits.max_body_bytes must be non-zero")]
    ZeroBodyLimit,

    #[error("limits.request_secs must be non-zero")]
    ZeroRequestTimeout,
}

/// Validate a configuration before it is accepted into the system.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.server.port {
        None => errors.push(ValidationError::MissingPort),
        Some(0) => errors.push(ValidationError::ZeroPort),
        Some(_) => {}
    }

    if !config.server.base_url.starts_with('/') {
        errors.push(ValidationError::RelativeBaseUrl(config.server.base_url.clone()));
    }

    for field in Field::ALL {
        let bounds = config.schema.bounds(field);
        if bounds.min_length > bounds.max_length {
            errors.push(ValidationError::InvertedBounds {
                field,
                min: bounds.min_length,
                max: bounds.max_length,
            });
        }
    }

    if config.session.inactivity_secs <= 0 {
        errors.push(ValidationError::NonPositiveSessionExpiry(
            config.session.inactivity_secs,
        ));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.limits.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
