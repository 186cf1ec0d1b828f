//! Unified error types for hollow.
//!
//! Every failure in the search/resolve/view handoff maps onto one of these
//! variants. The string prefix of each message doubles as a stable error code.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the hollow server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a result without a product id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No cached product exists under the requested key.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Upstream payload had an unexpected or empty shape.
    #[error("MALFORMED_DATA: {0}")]
    MalformedData(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid or disallowed URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Upstream request timed out.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Network failure or non-success HTTP response from upstream.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Upstream rejected the API key.
    #[error("UPSTREAM_AUTH_ERROR: {0}")]
    UpstreamAuth(String),

    /// Upstream rate limited the request.
    #[error("UPSTREAM_RATE_LIMITED: {0}")]
    UpstreamRateLimited(String),
}

impl Error {
    /// Stable machine-readable code, matching the message prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::MalformedData(_) => "MALFORMED_DATA",
            Error::Database(_) | Error::MigrationFailed(_) => "CACHE_ERROR",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::HttpError(_) => "HTTP_ERROR",
            Error::UpstreamAuth(_) => "UPSTREAM_AUTH_ERROR",
            Error::UpstreamRateLimited(_) => "UPSTREAM_RATE_LIMITED",
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedData(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::MalformedData(msg) => (-32004, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::UpstreamAuth(msg) => (-32009, msg.clone()),
            Error::UpstreamRateLimited(msg) => (-32010, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
