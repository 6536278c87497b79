use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request body for the flat image endpoint variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiImageBase64Request {
    pub prompt: String,
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Flat image reply: `{"imageBase64": "...", "mimeType": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeminiImageBase64Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn size_is_omitted_when_unset() {
        let req = GeminiImageBase64Request {
            prompt: "a red fox".to_string(),
            model: "imagen".to_string(),
            size: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"prompt": "a red fox", "model": "imagen"})
        );
    }

    #[test]
    fn flat_reply_fields_map() {
        let resp: GeminiImageBase64Response = serde_json::from_value(json!({
            "imageBase64": "QUJD",
            "seed": 7
        }))
        .unwrap();
        assert_eq!(resp.image_base64.as_deref(), Some("QUJD"));
        assert!(resp.mime_type.is_none());
        assert_eq!(resp.extra.get("seed"), Some(&json!(7)));
    }
}
