//! Caller-facing request and response bodies of the image relay.

use serde::{Deserialize, Serialize};

/// Inbound body. `prompt` is optional at the parse layer so that a missing
/// prompt and a blank prompt are reported the same way.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerateImageRequest {
    /// The prompt if it contains anything other than whitespace.
    pub fn usable_prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Normalized image payload returned with a 200.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub base64_data: String,
    pub mime_type: String,
}

/// Body of every non-405 failure response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayMessage {
    pub message: String,
}

impl RelayMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
