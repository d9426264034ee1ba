use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// A required credential is missing; the service keeps serving.
    #[error("{error}")]
    NotConfigured { error: String, message: String },

    /// Non-2xx answer from an upstream API, relayed with its own status.
    #[error("{provider} API error: {status}")]
    Upstream {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Bad Gateway: {error}")]
    BadGateway { error: String, details: String },

    #[error("Gateway timeout: {error}")]
    GatewayTimeout { error: String, details: String },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            message: None,
            path: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::NotFound(path) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    path: Some(path),
                    ..ErrorResponse::new("Endpoint not found")
                },
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse {
                    message: Some(msg),
                    ..ErrorResponse::new("Payload Too Large")
                },
            ),
            AppError::NotConfigured { error, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    message: Some(message),
                    ..ErrorResponse::new(error)
                },
            ),
            AppError::Upstream {
                provider,
                status,
                body,
            } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorResponse {
                    details: Some(body),
                    ..ErrorResponse::new(format!("{} API error: {}", provider, status))
                },
            ),
            AppError::BadGateway { error, details } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    details: Some(details),
                    ..ErrorResponse::new(error)
                },
            ),
            AppError::GatewayTimeout { error, details } => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorResponse {
                    details: Some(details),
                    ..ErrorResponse::new(error)
                },
            ),
            AppError::InternalError(err) => {
                tracing::error!(error = %err, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: Some(err.to_string()),
                        ..ErrorResponse::new("Internal server error")
                    },
                )
            }
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    details: Some(err.to_string()),
                    ..ErrorResponse::new("Configuration error")
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
