//! Application-level errors

use domain::DomainError;
use integration_poi::PoiError;
use integration_routing::RoutingError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Routing client error
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    /// POI client error
    #[error("POI discovery error: {0}")]
    Poi(#[from] PoiError),

    /// Referenced item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if this error was caused by caller input
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::ValidationError(_))
                | Self::Routing(RoutingError::Validation(_))
                | Self::Poi(PoiError::Validation(_))
        )
    }
}

impl From<config::ConfigError> for ApplicationError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
