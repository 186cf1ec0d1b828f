//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `serpapi_base_url` or `public_url` is not an http(s) URL
    /// - `bind_addr` is not a socket address
    /// - `country` or `language` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        for (field, value) in [("serpapi_base_url", &self.serpapi_base_url), ("public_url", &self.public_url)] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be an http(s) URL".into() });
            }
        }

        self.socket_addr()?;

        if self.country.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "country".into(), reason: "must not be empty".into() });
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "language".into(), reason: "must not be empty".into() });
        }

        if self.serpapi_api_key.is_none() {
            tracing::warn!("serpapi_api_key is not set; searches will return no results");
        }

        Ok(())
    }
}
