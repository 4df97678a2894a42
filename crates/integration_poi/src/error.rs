//! POI discovery error types

use infrastructure::Retryable;
use thiserror::Error;

/// Errors that can occur during POI discovery
#[derive(Debug, Error)]
pub enum PoiError {
    /// Malformed search parameters, raised before any network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The query service answered with a non-success status
    #[error("Overpass returned HTTP {status}: {body}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Network-level failure (DNS, connection refused, reset)
    #[error("Connection failed: {0}")]
    Transport(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Success status with a body that could not be understood
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PoiError {
    /// Returns true if the service rejected the request with HTTP 429
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Provider { status: 429, .. })
    }

    /// Returns true if this is a caller input error
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Retryable for PoiError {
    fn is_retryable(&self) -> bool {
        self.is_rate_limited()
    }
}
