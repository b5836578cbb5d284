use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway-local failure taxonomy.
///
/// Every variant maps to a locally synthesized JSON response. Responses
/// produced by an upstream (including upstream error statuses) are relayed
/// as-is and never pass through here.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("no route matches path: {0}")]
    RouteNotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("upstream request failed: {0}")]
    UpstreamUnreachable(#[from] reqwest::Error),

    #[error("upstream service URL is not configured")]
    UpstreamUnconfigured,
}

impl GatewayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamUnconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            GatewayError::Unauthorized(_) => "UNAUTHORIZED",
            GatewayError::UpstreamUnreachable(_) => "UPSTREAM_UNREACHABLE",
            GatewayError::UpstreamUnconfigured => "UPSTREAM_UNCONFIGURED",
        }
    }

    /// Get the user-facing error message
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::RouteNotFound(path) => format!("No route matches path: {}", path),
            GatewayError::Unauthorized(e) => format!("Authentication failed: {}", e),
            GatewayError::UpstreamUnreachable(e) => format!("Upstream request failed: {}", e),
            GatewayError::UpstreamUnconfigured => {
                "Upstream service URL is not configured".to_string()
            }
        }
    }

    /// Log this error with a level chosen by its class
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Gateway error"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                error_code = %code,
                "Request rejected by auth gate"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Client error"
            );
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let body = json!({
            "error": self.user_message(),
            "error_code": self.error_code(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
