//! Application configuration
//!
//! Values are layered: built-in defaults, then an optional
//! `roadtripper.toml`, then `ROADTRIPPER_*` environment variables using a
//! double underscore for nesting (`ROADTRIPPER_ROUTING__API_KEY`).

use std::path::Path;

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use infrastructure::LoggingConfig;
use integration_poi::PoiConfig;
use integration_routing::RoutingConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApplicationError;

const CONFIG_FILE: &str = "roadtripper";
const ENV_PREFIX: &str = "ROADTRIPPER";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directions client
    #[serde(default)]
    pub routing: RoutingConfig,

    /// POI client
    #[serde(default)]
    pub poi: PoiConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `roadtripper.toml` (if present) and the
    /// environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_builder(
            Config::builder().add_source(File::with_name(CONFIG_FILE).required(false)),
        )
    }

    /// Load configuration from an explicit file and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::from_builder(Config::builder().add_source(File::from(path.as_ref())))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Validate both client configurations
    ///
    /// A missing routing API key is only logged, since every route can
    /// still be estimated locally.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the invalid section.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.routing
            .validate()
            .map_err(|e| ApplicationError::Configuration(format!("routing: {e}")))?;
        self.poi
            .validate()
            .map_err(|e| ApplicationError::Configuration(format!("poi: {e}")))?;

        if !self.routing.has_api_key() {
            warn!("routing.api_key is not set, routes will be estimated locally");
        }
        Ok(())
    }
}
