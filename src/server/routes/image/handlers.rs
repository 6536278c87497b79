use super::extract::ImagePreprocess;
use crate::error::RelayError;
use crate::server::router::RelayState;
use axum::{Json, extract::State};
use lumen_schema::GenerationResult;

pub async fn generate_image_handler(
    State(state): State<RelayState>,
    ImagePreprocess(request, api_key): ImagePreprocess,
) -> Result<Json<GenerationResult>, RelayError> {
    let result = state.image_client.generate(&request, &api_key).await?;
    Ok(Json(result))
}

/// Liveness probe. Touches neither the credential nor upstream.
pub async fn healthz_handler() -> &'static str {
    "ok"
}
