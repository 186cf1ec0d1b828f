//! HTTP error responses for the hollow server.
//!
//! Every handler error is a [`hollow_core::Error`]; this maps it onto a
//! status code and a `{"error": CODE, "message": ...}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hollow_core::Error;
use serde_json::json;

/// Error returned from JSON API handlers.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) | Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MalformedData(_) | Error::HttpError(_) | Error::UpstreamAuth(_) => StatusCode::BAD_GATEWAY,
            Error::FetchTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::UpstreamRateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Database(_) | Error::MigrationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<hollow_client::ShoppingError> for ApiError {
    fn from(err: hollow_client::ShoppingError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "request failed");
        }
        let body = json!({ "error": self.0.code(), "message": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
