use super::{Content, InlineData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Gemini v1beta `generateContent` response.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[allow(non_snake_case)]
pub struct GeminiResponseBody {
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub promptFeedback: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usageMetadata: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelVersion: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GeminiResponseBody {
    /// First part, across all candidates in order, whose `inlineData` carries
    /// non-empty data.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| inline.data.as_deref().is_some_and(|d| !d.is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    #[serde(rename = "finishReason", skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_inline_data_after_text_part() {
        let body: GeminiResponseBody = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Here is your fox"},
                        {"inlineData": {"mimeType": "image/png", "data": "QUJD"}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let inline = body.first_inline_data().unwrap();
        assert_eq!(inline.data.as_deref(), Some("QUJD"));
        assert_eq!(inline.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn skips_empty_inline_data_and_searches_later_candidates() {
        let body: GeminiResponseBody = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": ""}}]}},
                {"finishReason": "SAFETY"},
                {"content": {"parts": [{"inlineData": {"data": "WFla"}}]}}
            ]
        }))
        .unwrap();

        let inline = body.first_inline_data().unwrap();
        assert_eq!(inline.data.as_deref(), Some("WFla"));
        assert!(inline.mime_type.is_none());
    }

    #[test]
    fn text_only_and_empty_responses_have_no_inline_data() {
        let text_only: GeminiResponseBody = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "I cannot draw that."}]}}]
        }))
        .unwrap();
        assert!(text_only.first_inline_data().is_none());

        let empty: GeminiResponseBody = serde_json::from_value(json!({})).unwrap();
        assert!(empty.candidates.is_empty());
        assert!(empty.first_inline_data().is_none());
    }
}
