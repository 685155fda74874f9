//! curator-server - multi-museum artwork search and exhibition service
//!
//! Startup order:
//! 1. Resolve and load the TOML config (defaults when absent or invalid)
//! 2. Initialize tracing (`RUST_LOG` beats `[logging] level`)
//! 3. Open session storage and restore the exhibition
//! 4. Register source adapters
//! 5. Serve HTTP until Ctrl+C / SIGTERM

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use curator_common::config::{load_config, resolve_config_path};
use curator_common::events::EventBus;
use curator_common::storage::open_store;
use curator_common::Exhibition;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use curator_server::config::resolve_harvard_api_key;
use curator_server::sources::ParallelSearch;
use curator_server::AppState;

/// Command-line arguments for curator-server
#[derive(Parser, Debug)]
#[command(name = "curator-server")]
#[command(about = "Search museum collections and curate a personal exhibition")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "CURATOR_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides the config file)
    #[arg(short, long, env = "CURATOR_BIND")]
    bind: Option<String>,

    /// Path to the TOML config file
    #[arg(short, long, env = "CURATOR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // clap already folded CURATOR_CONFIG into args.config
    let config_path = resolve_config_path(args.config.as_deref());
    let config = load_config(config_path.as_deref());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting curator-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = &config_path {
        info!("Config: {}", path.display());
    }

    let event_bus = EventBus::new(100);

    let store = open_store(&config.storage).context("Failed to open session storage")?;
    let exhibition = Arc::new(Exhibition::restore(store, event_bus.clone()));
    info!("Exhibition ready ({} items)", exhibition.count());

    let harvard_api_key = resolve_harvard_api_key(&config);
    let sources = ParallelSearch::from_config(&config, harvard_api_key)
        .context("Failed to build HTTP client")?;

    let state = AppState::new(sources, Arc::clone(&exhibition), event_bus);
    let app = curator_server::build_router(state);

    let port = args.port.unwrap_or(config.port);
    let bind = args.bind.unwrap_or_else(|| config.bind.clone());
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if config.storage.ephemeral {
        exhibition.expire_storage();
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
