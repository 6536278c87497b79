//! Typed Gemini v1beta `generateContent` request schema.
//!
//! Only the fields the relay sets or reads are modeled explicitly; anything
//! else the upstream sends back inside a `Content` is preserved in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Gemini `generateContent` request body.
///
/// Reference: <https://ai.google.dev/gemini-api/docs/image-generation>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerateContentRequest {
    /// Required conversation turns.
    pub contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GeminiGenerateContentRequest {
    /// Single-turn text request, the shape used for prompt-to-image calls.
    pub fn from_prompt(prompt: impl Into<String>, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
                extra: BTreeMap::new(),
            }],
            generation_config: Some(generation_config),
            extra: BTreeMap::new(),
        }
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Usually `"user"` or `"model"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub parts: Vec<Part>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One atomic piece of content inside a `Content` turn.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Inline media bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// `inlineData` payload. Both fields are optional on the wire; the relay
/// decides what a usable image looks like.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Base64-encoded bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// `generationConfig` object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,

    /// Config for image generation features (`imageSize`, `aspectRatio`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<Value>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_request_serializes_to_wire_shape() {
        let gc = GenerationConfig {
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            ..Default::default()
        };
        let req = GeminiGenerateContentRequest::from_prompt("a red fox", gc);

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "contents": [{"parts": [{"text": "a red fox"}]}],
                "generationConfig": {"responseModalities": ["TEXT", "IMAGE"]}
            })
        );
    }

    #[test]
    fn image_config_is_emitted_when_present() {
        let gc = GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            image_config: Some(json!({"imageSize": "1K"})),
            ..Default::default()
        };
        let req = GeminiGenerateContentRequest::from_prompt("x", gc);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value["generationConfig"]["imageConfig"],
            json!({"imageSize": "1K"})
        );
    }

    #[test]
    fn inline_data_fields_map_from_camel_case() {
        let part: Part = serde_json::from_value(json!({
            "inlineData": {"mimeType": "image/jpeg", "data": "QUJD"}
        }))
        .unwrap();

        let inline = part.inline_data.unwrap();
        assert_eq!(inline.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(inline.data.as_deref(), Some("QUJD"));
        assert!(part.text.is_none());
    }

    #[test]
    fn unknown_part_fields_preserved_in_extra() {
        let part: Part = serde_json::from_value(json!({
            "text": "caption",
            "thoughtSignature": "c2ln"
        }))
        .unwrap();
        assert_eq!(part.extra.get("thoughtSignature"), Some(&json!("c2ln")));
    }
}
