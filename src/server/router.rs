use crate::config::{UpstreamConfig, UpstreamContract};
use crate::credential::CredentialSource;
use crate::error::INTERNAL_MESSAGE;
use crate::providers::ImageClient;
use crate::providers::image_client::build_http_client;
use crate::server::routes::image;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderName, Method, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use base64::Engine as _;
use lumen_schema::RelayMessage;
use rand::RngCore;
use reqwest::header::HeaderValue;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{Instrument, error, info, info_span, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct RelayState {
    pub credentials: Arc<dyn CredentialSource>,
    pub upstream: Arc<UpstreamConfig>,
    pub image_client: ImageClient,
    /// Path the image handler is mounted on; set by [`lumen_router`].
    pub route_path: Arc<str>,
}

impl RelayState {
    pub fn new(
        upstream: UpstreamConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&upstream)?;
        let image_client = ImageClient::new(&upstream, client);
        Ok(Self {
            credentials,
            upstream: Arc::new(upstream),
            image_client,
            route_path: Arc::from(""),
        })
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "<non-string panic payload>"
    };
    error!(panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(RelayMessage::new(INTERNAL_MESSAGE)),
    )
        .into_response()
}

/// One access-log line. The image route also records which upstream
/// contract served it.
struct AccessLine<'a> {
    status: StatusCode,
    request_id: &'a str,
    method: &'a Method,
    protocol: &'static str,
    path: &'a str,
    contract: Option<UpstreamContract>,
    latency_ms: u64,
    user_agent: &'a str,
}

impl fmt::Display for AccessLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            self.status.as_u16(),
            self.request_id,
            self.method.as_str(),
            self.protocol,
            self.path,
            self.latency_ms,
            self.user_agent
        )?;
        if let Some(contract) = self.contract {
            write!(f, " | {contract:?}")?;
        }
        Ok(())
    }
}

async fn access_log(State(state): State<RelayState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    // Upstream retry logs emitted while handling this request carry its id.
    let span = info_span!("relay", request_id = %request_id);
    let start = Instant::now();
    let mut resp = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let line = AccessLine {
        status: resp.status(),
        request_id: &request_id,
        method: &method,
        protocol: format_http_version(version),
        path: uri.path(),
        contract: (uri.path() == state.route_path.as_ref()).then_some(state.upstream.contract),
        latency_ms: start.elapsed().as_millis() as u64,
        user_agent: &user_agent,
    };

    if line.status.is_server_error() {
        error!("{line}");
    } else if line.status.is_client_error() {
        warn!("{line}");
    } else {
        info!("{line}");
    }

    resp
}

pub fn lumen_router(mut state: RelayState, route_path: &str) -> Router {
    state.route_path = Arc::from(route_path);
    let state_for_log = state.clone();
    Router::new()
        .merge(image::router(route_path))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state_for_log, access_log))
}
