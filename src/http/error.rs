//! Caller-facing error responses.
//!
//! Each variant maps to one status code and one fixed JSON payload. Upstream
//! failure detail is logged where it happens and never reaches the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors the gateway answers with directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No credential header on a guarded path.
    #[error("Unauthorized")]
    Unauthorized,

    /// Category absent from the registry.
    #[error("Service '{0}' not found")]
    CategoryNotFound(String),

    /// Upstream did not answer within the deadline.
    #[error("Gateway timeout")]
    UpstreamTimeout,

    /// Any other transport or protocol failure.
    #[error("Bad gateway")]
    UpstreamUnavailable,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = match &self {
            GatewayError::CategoryNotFound(_) => json!({ "detail": self.to_string() }),
            _ => json!({ "message": self.to_string() }),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
