use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use imagepress_core::{
    create_counter_store, load_config, load_config_from_env, validate_config, Config,
    ConversionOrchestrator, DeploymentMode, SanitizedConfig, StandardEncoder, UsageCounters,
};
use imagepress_server::{api::create_router, state::AppState};

/// Environment variable naming an optional TOML config file.
const CONFIG_PATH_ENV: &str = "IMAGEPRESS_CONFIG";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = load()?;
    validate_config(&config).context("Configuration validation failed")?;

    init_tracing(config.server.mode);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default(),
        "Configuration loaded"
    );

    let store = create_counter_store(&config.counter_store)
        .context("Failed to create counter store")?;
    info!("Using counter store: {}", store.name());

    let encoder = StandardEncoder::new(config.encoder.clone());
    let orchestrator = ConversionOrchestrator::new(Arc::new(encoder));
    let usage = UsageCounters::new(store);

    if let Some(dir) = &config.server.static_dir {
        if !dir.is_dir() {
            warn!("Static directory {:?} does not exist", dir);
        }
    }

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, orchestrator, usage));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

fn load() -> Result<Config> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            let path = PathBuf::from(path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) => load_config_from_env().context("Failed to load config from environment"),
    }
}

/// Human-readable logs in development, JSON lines in production.
fn init_tracing(mode: DeploymentMode) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());

    let (pretty, json) = match mode {
        DeploymentMode::Development => (Some(tracing_subscriber::fmt::layer()), None),
        DeploymentMode::Production => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}
