//! SerpApi client error types.

use std::sync::Arc;

use hollow_core::Error;

/// Errors from the SerpApi shopping client.
#[derive(Debug, thiserror::Error)]
pub enum ShoppingError {
    /// No API key configured.
    #[error("missing API key: HOLLOW_SERPAPI_API_KEY not set")]
    MissingApiKey,

    /// Detail reference could not be parsed into a URL.
    #[error("invalid detail reference: {0}")]
    InvalidReference(String),

    /// Detail reference points somewhere other than the configured API host.
    #[error("detail reference host not allowed: {0}")]
    ForeignHost(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The API answered with an `error` field.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Detail endpoint returned nothing usable.
    #[error("empty detail record")]
    EmptyDetail,
}

impl From<reqwest::Error> for ShoppingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ShoppingError::Timeout } else { ShoppingError::Network(Arc::new(err)) }
    }
}

impl From<ShoppingError> for Error {
    fn from(err: ShoppingError) -> Self {
        match err {
            ShoppingError::MissingApiKey | ShoppingError::AuthError => Error::UpstreamAuth(err.to_string()),
            ShoppingError::RateLimited => Error::UpstreamRateLimited(err.to_string()),
            ShoppingError::Timeout => Error::FetchTimeout(err.to_string()),
            ShoppingError::InvalidReference(_) | ShoppingError::ForeignHost(_) => Error::InvalidUrl(err.to_string()),
            ShoppingError::Parse(_) | ShoppingError::EmptyDetail => Error::MalformedData(err.to_string()),
            ShoppingError::HttpError { status } => Error::HttpError(format!("HTTP {status}")),
            ShoppingError::Network(_) | ShoppingError::Upstream(_) => Error::HttpError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShoppingError::MissingApiKey;
        assert!(err.to_string().contains("API key"));

        let err = ShoppingError::ForeignHost("evil.example".to_string());
        assert!(err.to_string().contains("evil.example"));
    }

    #[test]
    fn test_core_error_mapping() {
        assert!(matches!(Error::from(ShoppingError::AuthError), Error::UpstreamAuth(_)));
        assert!(matches!(Error::from(ShoppingError::RateLimited), Error::UpstreamRateLimited(_)));
        assert!(matches!(Error::from(ShoppingError::Timeout), Error::FetchTimeout(_)));
        assert!(matches!(Error::from(ShoppingError::EmptyDetail), Error::MalformedData(_)));
        assert!(matches!(Error::from(ShoppingError::ForeignHost("x".into())), Error::InvalidUrl(_)));
        assert!(matches!(Error::from(ShoppingError::HttpError { status: 502 }), Error::HttpError(_)));
    }
}
