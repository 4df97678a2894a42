//! Domain-level errors

use thiserror::Error;

use crate::value_objects::{InvalidCoordinates, UnknownCategory};

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed caller input
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Coordinates outside the valid latitude/longitude range
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),

    /// Category name outside the closed set
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
