use crate::credential::ApiKey;
use crate::error::RelayError;
use crate::providers::GenerationRequest;
use crate::server::router::RelayState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::Method,
};
use lumen_schema::GenerateImageRequest;
use tracing::debug;

/// Validated image request: the outbound payload and the key to send it with.
///
/// Checks run in a fixed order: credential, method, body, prompt. Each check
/// short-circuits before anything after it is read.
pub struct ImagePreprocess(pub GenerationRequest, pub ApiKey);

impl<S> FromRequest<S> for ImagePreprocess
where
    S: Send + Sync + std::borrow::Borrow<RelayState>,
{
    type Rejection = RelayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let state = state.borrow();

        let api_key = state
            .credentials
            .api_key()
            .ok_or(RelayError::Configuration)?;

        if req.method() != Method::POST {
            return Err(RelayError::MethodNotAllowed(req.method().clone()));
        }

        let body = Bytes::from_request(req, &()).await.map_err(|rejection| {
            debug!(rejection = %rejection, "Failed to read request body");
            RelayError::invalid_body()
        })?;

        let parsed: GenerateImageRequest = serde_json::from_slice(&body).map_err(|e| {
            debug!(error = %e, "Request body is not a valid image request");
            RelayError::invalid_body()
        })?;

        let prompt = parsed.usable_prompt().ok_or_else(RelayError::missing_prompt)?;

        debug!(
            prompt_chars = prompt.chars().count(),
            contract = ?state.upstream.contract,
            "Accepted image request"
        );

        Ok(ImagePreprocess(
            GenerationRequest::new(prompt, &state.upstream),
            api_key,
        ))
    }
}
