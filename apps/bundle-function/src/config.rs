//! Function host configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

/// Default log filter when neither `BUNDLE_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,bundle=debug";

/// Host adapter configuration.
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    /// tracing-subscriber filter directive
    pub log_filter: String,

    /// Pretty-print the output document (debugging only)
    pub pretty_output: bool,

    /// Largest input document accepted, in bytes
    pub max_input_bytes: usize,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        FunctionConfig {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            pretty_output: false,
            max_input_bytes: 256 * 1024,
        }
    }
}

impl FunctionConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Environment Variables
    /// - `BUNDLE_LOG`: log filter, falls back to `RUST_LOG`
    /// - `BUNDLE_PRETTY_OUTPUT`: `true` / `false`
    /// - `BUNDLE_MAX_INPUT_BYTES`: input size limit
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = FunctionConfig::default();

        let config = FunctionConfig {
            log_filter: lookup("BUNDLE_LOG")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_filter),

            pretty_output: match lookup("BUNDLE_PRETTY_OUTPUT") {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("BUNDLE_PRETTY_OUTPUT".to_string()))?,
                None => defaults.pretty_output,
            },

            max_input_bytes: match lookup("BUNDLE_MAX_INPUT_BYTES") {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("BUNDLE_MAX_INPUT_BYTES".to_string()))?,
                None => defaults.max_input_bytes,
            },
        };

        if config.max_input_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "BUNDLE_MAX_INPUT_BYTES".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
