#![allow(dead_code)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use lumen::config::UpstreamConfig;
use serde_json::Value;
use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use tokio::net::TcpListener;
use url::Url;

#[derive(Debug, Clone)]
pub struct Captured {
    pub at: Instant,
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

type Script = dyn Fn(usize) -> (StatusCode, String) + Send + Sync;

/// Upstream stand-in. `script` receives the zero-based call index and returns
/// the status and raw JSON body to answer with.
#[derive(Clone)]
pub struct MockUpstream {
    calls: Arc<Mutex<Vec<Captured>>>,
    script: Arc<Script>,
}

impl MockUpstream {
    pub fn new(script: impl Fn(usize) -> (StatusCode, String) + Send + Sync + 'static) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            script: Arc::new(script),
        }
    }

    pub fn calls(&self) -> Vec<Captured> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub async fn spawn(&self) -> Url {
        let app = Router::new()
            .fallback(upstream_handler)
            .with_state(self.clone());
        spawn_test_server(app).await
    }
}

async fn upstream_handler(State(mock): State<MockUpstream>, uri: Uri, body: Bytes) -> Response {
    let index = {
        let mut calls = mock.calls.lock().unwrap();
        calls.push(Captured {
            at: Instant::now(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });
        calls.len() - 1
    };

    let (status, body) = (mock.script)(index);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{}", addr)).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

/// Upstream config pointed at `base_url` with a 10ms backoff base so retry
/// tests finish quickly while keeping the exponential shape.
pub fn fast_upstream_config(base_url: Url) -> UpstreamConfig {
    UpstreamConfig {
        base_url,
        base_delay_ms: 10,
        max_jitter_ms: 5,
        request_timeout_secs: 10,
        ..Default::default()
    }
}

pub fn image_reply(data: &str, mime_type: Option<&str>) -> String {
    let inline = match mime_type {
        Some(mime) => serde_json::json!({"data": data, "mimeType": mime}),
        None => serde_json::json!({"data": data}),
    };
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": "Here you go"}, {"inlineData": inline}]
            },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

pub fn rate_limit_reply() -> (StatusCode, String) {
    (
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#
            .to_string(),
    )
}
