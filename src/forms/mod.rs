//! Form field schema and validation-message formatting.
//!
//! The schema carries the length bounds that the persistence layer enforces;
//! [`format_validation_message`] turns that layer's raw error text into
//! messages fit for a flash.

pub mod messages;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use messages::format_validation_message;

/// Fields with configured length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
    Description,
    Snippet,
}

impl Field {
    /// Match order for raw messages. The first field whose name appears wins.
    pub const ALL: [Field; 4] = [
        Field::Username,
        Field::Password,
        Field::Description,
        Field::Snippet,
    ];

    /// Name as it appears in raw validation errors.
    pub fn key(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::Description => "description",
            Field::Snippet => "snippet",
        }
    }

    /// Name as it is shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Description => "Description",
            Field::Snippet => "Snippet",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Inclusive length bounds for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LengthBounds {
    pub min_length: usize,
    pub max_length: usize,
}

impl LengthBounds {
    pub const fn new(min_length: usize, max_length: usize) -> Self {
        Self { min_length, max_length }
    }
}

/// Length bounds for every known field.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationSchema {
    pub username: LengthBounds,
    pub password: LengthBounds,
    pub description: LengthBounds,
    pub snippet: LengthBounds,
}

impl ValidationSchema {
    pub fn bounds(&self, field: Field) -> LengthBounds {
        match field {
            Field::Username => self.username,
            Field::Password => self.password,
            Field::Description => self.description,
            Field::Snippet => self.snippet,
        }
    }
}

impl Default for ValidationSchema {
    fn default() -> Self {
        Self {
            username: LengthBounds::new(3, 20),
            password: LengthBounds::new(10, 256),
            description: LengthBounds::new(1, 100),
            snippet: LengthBounds::new(1, 10_000),
        }
    }
}
