pub mod backoff;
pub mod image_client;
pub mod normalize;
pub mod policy;
pub mod request;

pub use backoff::{RelayBackoff, RelayBackoffBuilder};
pub use image_client::ImageClient;
pub use normalize::{DEFAULT_MIME_TYPE, normalize_response};
pub use policy::{UPSTREAM_BODY_PREVIEW_CHARS, classify_upstream_failure};
pub use request::GenerationRequest;
