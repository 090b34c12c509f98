//! Core error types for `instascrape`.

use thiserror::Error;

/// Core error type for model mapping and identifier handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field was absent from a raw JSON node.
    #[error("Invalid data: missing or malformed field `{0}`")]
    InvalidData(String),

    /// An identifier could not be converted (non-numeric id, bad shortcode).
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Shorthand for a missing required field.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::InvalidData(field.into())
    }
}
