//! Session-backed flash messages.
//!
//! A flash is stored under one session key and removed by the next page that
//! renders it.

use serde::{Deserialize, Serialize};
use tower_sessions::{session, Session};

/// Session key holding the pending flash.
pub const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Danger,
    Warning,
    Info,
    Success,
}

/// A single-display notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(rename = "type")]
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn new(kind: FlashKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self::new(FlashKind::Danger, text)
    }

    /// Replace any pending flash with this one.
    pub async fn store(&self, session: &Session) -> Result<(), session::Error> {
        session.insert(FLASH_KEY, self).await
    }

    /// Read and clear the pending flash.
    pub async fn take(session: &Session) -> Result<Option<Flash>, session::Error> {
        session.remove(FLASH_KEY).await
    }
}
