pub mod gemini;
pub mod relay;

pub use gemini::{
    GeminiGenerateContentRequest, GeminiImageBase64Request, GeminiImageBase64Response,
    GeminiResponseBody, GeminiUpstreamErrorBody,
};
pub use relay::{GenerateImageRequest, GenerationResult, RelayMessage};
