mod error_body;
mod generate_content_request;
mod image_base64;
mod v1beta_response;

pub use error_body::{GeminiUpstreamErrorBody, GeminiUpstreamErrorObject};
pub use generate_content_request::{
    Content, GeminiGenerateContentRequest, GenerationConfig, InlineData, Part,
};
pub use image_base64::{GeminiImageBase64Request, GeminiImageBase64Response};
pub use v1beta_response::{Candidate, GeminiResponseBody};
