pub mod extract;
pub mod handlers;

use crate::server::router::RelayState;
use handlers::{generate_image_handler, healthz_handler};

use axum::{
    Router,
    routing::{any, get},
};

/// The image route accepts every method; the handler rejects non-POST itself
/// so that a missing credential is reported first.
pub fn router(route_path: &str) -> Router<RelayState> {
    Router::new()
        .route(route_path, any(generate_image_handler))
        .route("/healthz", get(healthz_handler))
}
