//! Logging initialization
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a
//! console or JSON formatting layer. `RUST_LOG` takes precedence over the
//! configured filter.

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Text,
    /// Structured JSON, one object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives (e.g. "info", "integration_routing=debug")
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directives could not be parsed
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed
    #[error("Tracing already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if neither `RUST_LOG` nor the
/// configured filter parse, and `TelemetryError::AlreadyInitialized` if a
/// global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    info!(format = ?config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Text);
    }

    #[test]
    fn format_deserializes_lowercase() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn second_initialization_is_an_error() {
        let config = LoggingConfig {
            filter: "debug".to_string(),
            format: LogFormat::Json,
        };

        assert!(init_tracing(&config).is_ok());
        assert!(matches!(
            init_tracing(&config),
            Err(TelemetryError::AlreadyInitialized(_))
        ));
    }
}
