use lumen_schema::{GeminiImageBase64Response, GeminiResponseBody, GenerationResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamContract;
use crate::error::RelayError;
use crate::providers::UPSTREAM_BODY_PREVIEW_CHARS;
use crate::utils::logging::body_preview;

pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Turns a 2xx upstream body into a [`GenerationResult`].
///
/// Only a body that is not JSON at all is transient. Valid JSON in an
/// unexpected shape, or in the expected shape without image data, is terminal.
pub fn normalize_response(
    contract: UpstreamContract,
    bytes: &[u8],
) -> Result<GenerationResult, RelayError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| invalid_json(e, bytes))?;

    let found = match contract {
        UpstreamContract::GenerateContent => {
            shaped::<GeminiResponseBody>(value).and_then(|body| from_generate_content(&body))
        }
        UpstreamContract::ImageBase64 => {
            shaped::<GeminiImageBase64Response>(value).and_then(|body| from_image_base64(&body))
        }
    };

    found.ok_or(RelayError::UpstreamTerminal)
}

fn shaped<T: DeserializeOwned>(value: Value) -> Option<T> {
    serde_json::from_value(value)
        .inspect_err(|e| debug!(error = %e, "Upstream success body has an unexpected shape"))
        .ok()
}

fn from_generate_content(body: &GeminiResponseBody) -> Option<GenerationResult> {
    let inline = body.first_inline_data()?;
    Some(GenerationResult {
        base64_data: inline.data.clone()?,
        mime_type: mime_or_default(inline.mime_type.as_deref()),
    })
}

fn from_image_base64(body: &GeminiImageBase64Response) -> Option<GenerationResult> {
    let data = body.image_base64.as_deref().filter(|d| !d.is_empty())?;
    Some(GenerationResult {
        base64_data: data.to_string(),
        mime_type: mime_or_default(body.mime_type.as_deref()),
    })
}

fn mime_or_default(mime_type: Option<&str>) -> String {
    mime_type
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

fn invalid_json(err: serde_json::Error, bytes: &[u8]) -> RelayError {
    debug!(
        error = %err,
        body = %body_preview(bytes, UPSTREAM_BODY_PREVIEW_CHARS),
        "Upstream success body is not valid JSON"
    );
    RelayError::UpstreamTransient {
        status: None,
        detail: format!("invalid upstream JSON: {err}"),
    }
}
