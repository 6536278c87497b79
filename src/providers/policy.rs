use crate::error::RelayError;
use crate::utils::logging::{body_preview, with_pretty_json_debug};
use lumen_schema::GeminiUpstreamErrorBody;
use reqwest::StatusCode;

pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 300;

/// Maps a non-2xx upstream reply to a retryable [`RelayError`].
///
/// Google-style error envelopes are parsed for their message; anything else
/// is kept as a truncated preview. Either way the text stays in diagnostics.
pub async fn classify_upstream_failure(resp: reqwest::Response) -> RelayError {
    let status = resp.status();
    let bytes = match resp.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return RelayError::from(e),
    };
    classify_failure_body(status, &bytes)
}

pub(crate) fn classify_failure_body(status: StatusCode, bytes: &[u8]) -> RelayError {
    if let Ok(error) = serde_json::from_slice::<GeminiUpstreamErrorBody>(bytes) {
        with_pretty_json_debug(&error, |pretty_error| {
            tracing::debug!(%status, body = %pretty_error, "Upstream structured error");
        });

        let message = error
            .inner
            .message
            .filter(|m| !m.trim().is_empty())
            .or(error.inner.status)
            .unwrap_or_else(|| status.to_string());
        return RelayError::UpstreamTransient {
            status: Some(status),
            detail: message,
        };
    }

    let preview = body_preview(bytes, UPSTREAM_BODY_PREVIEW_CHARS);
    tracing::debug!(%status, body = %preview, "Upstream unstructured error");

    if status == StatusCode::TOO_MANY_REQUESTS {
        return RelayError::rate_limited(preview);
    }
    RelayError::UpstreamTransient {
        status: Some(status),
        detail: preview,
    }
}
