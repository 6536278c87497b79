use axum::{
    Json,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use lumen_schema::RelayMessage;
use thiserror::Error as ThisError;

use super::IsRetryable;

pub(crate) const MISSING_PROMPT_MESSAGE: &str = "Prompt is required.";
pub(crate) const INVALID_BODY_MESSAGE: &str = "Request body must be a JSON object.";
pub(crate) const INTERNAL_MESSAGE: &str = "Internal server error during image generation.";

#[derive(Debug, ThisError)]
pub enum RelayError {
    /// The upstream API key is not present in process configuration.
    #[error("Upstream API key is not configured")]
    Configuration,

    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),

    /// Caller-facing validation message.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Rate limit, transport failure or unexpected status. Absorbed by the retry loop.
    #[error("Upstream transient failure: status={status:?}, detail={detail:.200}")]
    UpstreamTransient {
        status: Option<StatusCode>,
        /// Diagnostics only. Never forwarded to the caller.
        detail: String,
    },

    /// Upstream honored the protocol but returned no usable image.
    #[error("Upstream returned no valid image")]
    UpstreamTerminal,

    #[error("Upstream failed after {attempts} attempts")]
    UpstreamExhausted { attempts: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub(crate) fn missing_prompt() -> Self {
        RelayError::Validation(MISSING_PROMPT_MESSAGE.to_string())
    }

    pub(crate) fn invalid_body() -> Self {
        RelayError::Validation(INVALID_BODY_MESSAGE.to_string())
    }

    pub(crate) fn rate_limited(detail: impl Into<String>) -> Self {
        RelayError::UpstreamTransient {
            status: Some(StatusCode::TOO_MANY_REQUESTS),
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key in its query string.
        let err = err.without_url();
        RelayError::UpstreamTransient {
            status: err.status(),
            detail: err.to_string(),
        }
    }
}

impl IsRetryable for RelayError {
    fn is_retryable(&self) -> bool {
        matches!(self, RelayError::UpstreamTransient { .. })
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RelayError::MethodNotAllowed(method) => {
                tracing::warn!(method = %method, "Rejected non-POST request");
                return (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(header::ALLOW, "POST")],
                    "Method not allowed",
                )
                    .into_response();
            }

            RelayError::Validation(message) => {
                tracing::warn!(message = %message, "Image request rejected");
                (StatusCode::BAD_REQUEST, message)
            }

            RelayError::Configuration => {
                tracing::error!("Upstream API key is not configured; refusing request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream API key is not configured.".to_string(),
                )
            }

            RelayError::UpstreamTerminal => {
                tracing::error!("Upstream responded without inline image data");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream returned no valid image.".to_string(),
                )
            }

            RelayError::UpstreamExhausted { attempts } => {
                tracing::error!(attempts, "Upstream image generation exhausted all attempts");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image generation failed after multiple attempts.".to_string(),
                )
            }

            e @ (RelayError::UpstreamTransient { .. } | RelayError::Internal(_)) => {
                tracing::error!(error = %e, "Image relay internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        (status, Json(RelayMessage { message })).into_response()
    }
}
