mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wrapforge_core::{
    load_config, load_config_or_default, validate_config, AssetStore, GenerationClient,
    GenerationOrchestrator, KieAssetStore, KieClient, StubAssetStore, StubGenerationClient,
};

use api::create_router;
use state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("WrapForge v{}", VERSION);

    // Load configuration. An explicit WRAPFORGE_CONFIG path must exist;
    // the implicit config.toml lookup tolerates a missing file so env-only
    // deployments work.
    let config = match std::env::var("WRAPFORGE_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        Err(_) => {
            let path = PathBuf::from("config.toml");
            if !path.exists() {
                warn!("No config.toml found, using defaults with environment overrides");
            } else {
                info!("Loading configuration from {:?}", path);
            }
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Wire the generation backend. Without an API key the server runs in
    // stub mode and answers with placeholder images.
    let api_key_configured = config
        .generation
        .api_key
        .as_deref()
        .map(|key| !key.trim().is_empty())
        .unwrap_or(false);

    let (client, assets): (Arc<dyn GenerationClient>, Arc<dyn AssetStore>) = if api_key_configured {
        info!(
            "Using KIE generation backend at {}",
            config.generation.base_url
        );
        (
            Arc::new(KieClient::new(config.generation.clone())),
            Arc::new(KieAssetStore::new(config.generation.clone())),
        )
    } else {
        warn!("No API key configured, running in stub mode");
        (
            Arc::new(StubGenerationClient::new()),
            Arc::new(StubAssetStore),
        )
    };

    info!(
        "Orchestrator: poll every {} ms, budget {} checks, stuck after {} zero-progress checks",
        config.orchestrator.poll_interval_ms,
        config.orchestrator.max_poll_attempts,
        config.orchestrator.stuck_threshold
    );

    let orchestrator = Arc::new(GenerationOrchestrator::new(
        client,
        config.orchestrator.clone(),
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), orchestrator, assets));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
