use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Which upstream response shape the relay targets.
///
/// The image API has shipped both a nested `candidates[].content.parts[].inlineData`
/// reply and a flat `imageBase64` reply; deployments pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamContract {
    #[default]
    GenerateContent,
    ImageBase64,
}

/// Upstream image API configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// TOML: `upstream.contract`. Default: `generate_content`.
    #[serde(default)]
    pub contract: UpstreamContract,

    /// Scheme and host of the upstream API.
    /// TOML: `upstream.base_url`. Default: `https://generativelanguage.googleapis.com`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// TOML: `upstream.model`. Default: `gemini-2.5-flash-image-preview`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sent as `generationConfig.responseModalities`.
    /// TOML: `upstream.response_modalities`. Default: `["TEXT", "IMAGE"]`.
    #[serde(default = "default_response_modalities")]
    pub response_modalities: Vec<String>,

    /// Optional requested output size (e.g. `"1K"`).
    /// TOML: `upstream.image_size`.
    #[serde(default)]
    pub image_size: Option<String>,

    /// Name of the environment variable holding the API key. Read on every request.
    /// TOML: `upstream.api_key_env`. Default: `GEMINI_API_KEY`.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Optional upstream HTTP proxy. Example: `http://127.0.0.1:1080`.
    /// TOML: `upstream.proxy`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// TOML: `upstream.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// TOML: `upstream.request_timeout_secs`. Default: `120`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Total attempts per call, the first one included.
    /// TOML: `upstream.max_attempts`. Default: `5`.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Delay before retry `n` is `2^n * base_delay_ms` plus jitter.
    /// TOML: `upstream.base_delay_ms`. Default: `1000`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Jitter is drawn uniformly from `[0, max_jitter_ms)`.
    /// TOML: `upstream.max_jitter_ms`. Default: `500`.
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

impl UpstreamConfig {
    pub(crate) fn validate(&self) -> Result<(), figment::Error> {
        if self.max_attempts == 0 {
            return Err(figment::Error::from(
                "upstream.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(figment::Error::from(
                "upstream.model must be set and non-empty".to_string(),
            ));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(figment::Error::from(
                "upstream.api_key_env must be set and non-empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_jitter(&self) -> Duration {
        Duration::from_millis(self.max_jitter_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            contract: UpstreamContract::default(),
            base_url: default_base_url(),
            model: default_model(),
            response_modalities: default_response_modalities(),
            image_size: None,
            api_key_env: default_api_key_env(),
            proxy: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://generativelanguage.googleapis.com").expect("static url is valid")
}

fn default_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_response_modalities() -> Vec<String> {
    vec!["TEXT".to_string(), "IMAGE".to_string()]
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_attempts() -> usize {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_jitter_ms() -> u64 {
    500
}
