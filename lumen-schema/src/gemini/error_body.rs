use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Google-style error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiUpstreamErrorBody {
    #[serde(rename = "error")]
    pub inner: GeminiUpstreamErrorObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiUpstreamErrorObject {
    #[serde(default)]
    pub code: Option<u16>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rate_limit_envelope_parses() {
        let body: GeminiUpstreamErrorBody = serde_json::from_value(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        }))
        .unwrap();
        assert_eq!(body.inner.code, Some(429));
        assert_eq!(body.inner.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
    }

    #[test]
    fn envelope_without_error_key_is_rejected() {
        assert!(serde_json::from_value::<GeminiUpstreamErrorBody>(json!({"message": "x"})).is_err());
    }
}
