use lumen::config::Config;
use lumen::credential::{CredentialSource, EnvCredential};
use lumen::server::router::{RelayState, lumen_router};
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        loglevel = %cfg.basic.loglevel,
        route_path = %cfg.basic.route_path,
        contract = ?cfg.upstream.contract,
        base_url = %cfg.upstream.base_url,
        model = %cfg.upstream.model,
        api_key_env = %cfg.upstream.api_key_env,
        proxy = %cfg.upstream.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        max_attempts = cfg.upstream.max_attempts,
        "Configuration loaded"
    );

    let credentials = EnvCredential::new(cfg.upstream.api_key_env.clone());
    if credentials.api_key().is_none() {
        // Requests will answer 500 until the variable is provided.
        warn!(
            api_key_env = %cfg.upstream.api_key_env,
            "Upstream API key variable is unset or blank"
        );
    }

    let state = RelayState::new(cfg.upstream.clone(), Arc::new(credentials))?;
    let app = lumen_router(state, &cfg.basic.route_path);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
