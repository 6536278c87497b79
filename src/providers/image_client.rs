use crate::config::UpstreamConfig;
use crate::credential::ApiKey;
use crate::error::{IsRetryable, RelayError};
use crate::providers::{
    RelayBackoffBuilder, classify_upstream_failure, normalize_response, request::GenerationRequest,
};
use crate::utils::logging::with_pretty_json_debug;
use backon::Retryable;
use lumen_schema::GenerationResult;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

pub const LUMEN_USER_AGENT: &str = concat!("lumen/", env!("CARGO_PKG_VERSION"));

/// Builds the shared reqwest client for upstream calls.
pub fn build_http_client(cfg: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .user_agent(LUMEN_USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(cfg.connect_timeout())
        .timeout(cfg.request_timeout());

    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }

    builder.build()
}

/// Calls the upstream image endpoint with exponential backoff.
///
/// Rate limits, transport failures, non-2xx replies and unparsable bodies are
/// retried until the attempt budget runs out. A well-formed reply without an
/// image ends the call immediately.
#[derive(Clone)]
pub struct ImageClient {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    backoff: RelayBackoffBuilder,
}

impl ImageClient {
    pub fn new(cfg: &UpstreamConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: cfg.base_url.clone(),
            model: cfg.model.clone(),
            backoff: RelayBackoffBuilder::from_config(cfg),
        }
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
        api_key: &ApiKey,
    ) -> Result<GenerationResult, RelayError> {
        let endpoint = request
            .endpoint(&self.base_url, &self.model)
            .map_err(|e| RelayError::Internal(format!("invalid upstream endpoint: {e}")))?;

        with_pretty_json_debug(request, |pretty_body| {
            debug!(
                endpoint = %endpoint,
                model = %self.model,
                body = %pretty_body,
                "[Upstream] Outbound image request"
            );
        });

        let mut url = endpoint.clone();
        url.query_pairs_mut().append_pair("key", api_key.expose());

        let contract = request.contract();
        let max_attempts = self.backoff.max_attempts();
        let client = self.client.clone();
        let payload = request.clone();
        let started = Instant::now();

        let mut attempt = 0usize;
        let op = move || {
            attempt += 1;
            let current = attempt;
            let client = client.clone();
            let url = url.clone();
            let payload = payload.clone();
            async move {
                debug!(attempt = current, max_attempts, "[Upstream] Sending image request");

                let resp = client.post(url).json(&payload).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(classify_upstream_failure(resp).await);
                }

                let bytes = resp.bytes().await?;
                normalize_response(contract, &bytes)
            }
        };

        let mut retry = 0usize;
        let outcome = op
            .retry(self.backoff)
            .when(|err: &RelayError| err.is_retryable())
            .notify(|err: &RelayError, delay: Duration| {
                retry += 1;
                warn!(
                    attempt = retry,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "[Upstream] Attempt failed, retrying after {:?}",
                    delay
                );
            })
            .await;

        match outcome {
            Ok(result) => {
                info!(
                    model = %self.model,
                    mime_type = %result.mime_type,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "[Upstream] Image generated"
                );
                Ok(result)
            }
            Err(err) if err.is_retryable() => {
                error!(
                    attempts = max_attempts,
                    last_error = %err,
                    "[Upstream] Giving up on image request"
                );
                Err(RelayError::UpstreamExhausted {
                    attempts: max_attempts,
                })
            }
            Err(err) => Err(err),
        }
    }
}
