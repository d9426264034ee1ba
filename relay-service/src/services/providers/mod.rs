//! Upstream image-description providers.
//!
//! The relay talks to its AI backend only through [`ImageDescriber`], so the
//! Gemini REST client and the in-process mock are interchangeable.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use service_core::error::AppError;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Upstream answered with a non-2xx status.
    #[error("API error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Upstream answered 2xx but without usable text. Holds the raw body.
    #[error("Unexpected response format")]
    UnexpectedResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Client error: {0}")]
    Client(String),
}

impl ProviderError {
    /// Map onto the HTTP error envelope, naming the provider in messages.
    pub fn into_app_error(self, provider: &str) -> AppError {
        match self {
            ProviderError::NotConfigured(msg) => AppError::NotConfigured {
                error: msg,
                message: "Please set the GEMINI_API_KEY environment variable".to_string(),
            },
            ProviderError::Upstream { status, body } => AppError::Upstream {
                provider: provider.to_string(),
                status,
                body,
            },
            ProviderError::UnexpectedResponse(raw) => AppError::BadGateway {
                error: "Unexpected response format".to_string(),
                details: raw,
            },
            ProviderError::Timeout(after) => AppError::GatewayTimeout {
                error: format!("{} API timeout", provider),
                details: format!("No response within {}s", after.as_secs_f32()),
            },
            ProviderError::NetworkError(msg) => AppError::BadGateway {
                error: format!("{} API unreachable", provider),
                details: msg,
            },
            ProviderError::Client(msg) => AppError::InternalError(anyhow::anyhow!(msg)),
        }
    }
}

/// Text produced for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescription {
    /// Trimmed description text.
    pub text: String,

    /// Model identifier that produced it.
    pub model: String,
}

/// `describe_image(bytes, mime_type) -> text | error`.
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    /// Provider name used in error messages, e.g. `Gemini`.
    fn name(&self) -> &str;

    /// Describe raw image bytes. Single attempt, no retry.
    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ImageDescription, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_keeps_status() {
        let err = ProviderError::Upstream {
            status: 429,
            body: "slow down".into(),
        }
        .into_app_error("Gemini");

        match err {
            AppError::Upstream {
                provider,
                status,
                body,
            } => {
                assert_eq!(provider, "Gemini");
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn unexpected_response_is_bad_gateway() {
        let err = ProviderError::UnexpectedResponse("{}".into()).into_app_error("Gemini");
        assert!(matches!(
            err,
            AppError::BadGateway { ref error, ref details }
                if error == "Unexpected response format" && details == "{}"
        ));
    }

    #[test]
    fn timeout_is_gateway_timeout() {
        let err = ProviderError::Timeout(Duration::from_secs(30)).into_app_error("Gemini");
        assert!(matches!(
            err,
            AppError::GatewayTimeout { ref error, .. } if error == "Gemini API timeout"
        ));
    }
}
