use lumen_schema::gemini::{
    GeminiGenerateContentRequest, GeminiImageBase64Request, GenerationConfig,
};
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::config::{UpstreamConfig, UpstreamContract};

/// Outbound payload for one image call: the prompt plus the fixed generation
/// parameters of the configured contract.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GenerationRequest {
    GenerateContent(GeminiGenerateContentRequest),
    ImageBase64(GeminiImageBase64Request),
}

impl GenerationRequest {
    pub fn new(prompt: &str, cfg: &UpstreamConfig) -> Self {
        match cfg.contract {
            UpstreamContract::GenerateContent => {
                let generation_config = GenerationConfig {
                    response_modalities: Some(cfg.response_modalities.clone()),
                    image_config: cfg
                        .image_size
                        .as_ref()
                        .map(|size| json!({ "imageSize": size })),
                    ..Default::default()
                };
                GenerationRequest::GenerateContent(GeminiGenerateContentRequest::from_prompt(
                    prompt,
                    generation_config,
                ))
            }
            UpstreamContract::ImageBase64 => {
                GenerationRequest::ImageBase64(GeminiImageBase64Request {
                    prompt: prompt.to_string(),
                    model: cfg.model.clone(),
                    size: cfg.image_size.clone(),
                })
            }
        }
    }

    pub fn contract(&self) -> UpstreamContract {
        match self {
            GenerationRequest::GenerateContent(_) => UpstreamContract::GenerateContent,
            GenerationRequest::ImageBase64(_) => UpstreamContract::ImageBase64,
        }
    }

    /// Endpoint without credentials. `base_url` is expected to be scheme and host.
    pub fn endpoint(&self, base_url: &Url, model: &str) -> Result<Url, url::ParseError> {
        let rpc = match self.contract() {
            UpstreamContract::GenerateContent => "generateContent",
            UpstreamContract::ImageBase64 => "generateImage",
        };
        base_url.join(&format!("v1beta/models/{model}:{rpc}"))
    }
}
