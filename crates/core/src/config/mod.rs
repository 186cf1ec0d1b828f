//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (HOLLOW_*)
//! 2. TOML config file (if HOLLOW_CONFIG_FILE set)
//! 3. Built-in defaults

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which surface the server binary exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// HTTP API and server-rendered pages.
    #[default]
    Http,
    /// MCP tools over stdin/stdout.
    Stdio,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (HOLLOW_*)
/// 2. TOML config file (if HOLLOW_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SerpApi key used for shopping search and product detail calls.
    ///
    /// Set via HOLLOW_SERPAPI_API_KEY environment variable.
    /// Required only when an upstream call is made.
    #[serde(default)]
    pub serpapi_api_key: Option<String>,

    /// SerpApi base URL. Detail references must point at this host.
    ///
    /// Set via HOLLOW_SERPAPI_BASE_URL environment variable.
    #[serde(default = "default_serpapi_base_url")]
    pub serpapi_base_url: String,

    /// Path to SQLite cache database.
    ///
    /// Set via HOLLOW_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for upstream requests.
    ///
    /// Set via HOLLOW_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream request timeout in milliseconds.
    ///
    /// Set via HOLLOW_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Socket address the HTTP server binds to.
    ///
    /// Set via HOLLOW_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Externally visible base URL, used to build product page links.
    ///
    /// Set via HOLLOW_PUBLIC_URL environment variable.
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Surface to serve: `http` or `stdio`.
    ///
    /// Set via HOLLOW_TRANSPORT environment variable.
    #[serde(default)]
    pub transport: Transport,

    /// Two-letter country code passed to the search API (`gl`).
    ///
    /// Set via HOLLOW_COUNTRY environment variable.
    #[serde(default = "default_country")]
    pub country: String,

    /// Interface language passed to the search API (`hl`).
    ///
    /// Set via HOLLOW_LANGUAGE environment variable.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_serpapi_base_url() -> String {
    "https://serpapi.com".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./hollow-cache.sqlite")
}

fn default_user_agent() -> String {
    "hollow/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".into()
}

fn default_public_url() -> String {
    "http://127.0.0.1:3000".into()
}

fn default_country() -> String {
    "us".into()
}

fn default_language() -> String {
    "en".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            serpapi_api_key: None,
            serpapi_base_url: default_serpapi_base_url(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            bind_addr: default_bind_addr(),
            public_url: default_public_url(),
            transport: Transport::default(),
            country: default_country(),
            language: default_language(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `bind_addr` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            field: "bind_addr".into(),
            reason: e.to_string(),
        })
    }

    /// Absolute URL of the detail page for a product.
    pub fn product_url(&self, location: &str) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), location)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `HOLLOW_`
    /// 2. TOML file from `HOLLOW_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("HOLLOW_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("HOLLOW_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./hollow-cache.sqlite"));
        assert_eq!(config.user_agent, "hollow/0.1");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.serpapi_base_url, "https://serpapi.com");
        assert_eq!(config.transport, Transport::Http);
        assert_eq!(config.country, "us");
        assert_eq!(config.language, "en");
        assert!(config.serpapi_api_key.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 3000);

        let config = AppConfig { bind_addr: "not-an-addr".into(), ..Default::default() };
        assert!(matches!(config.socket_addr(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_product_url_joins_without_double_slash() {
        let config = AppConfig { public_url: "https://shop.example/".into(), ..Default::default() };
        assert_eq!(config.product_url("/product/A2"), "https://shop.example/product/A2");
    }

    #[test]
    fn test_transport_deserializes_lowercase() {
        let transport: Transport = serde_json::from_str("\"stdio\"").unwrap();
        assert_eq!(transport, Transport::Stdio);
    }
}
