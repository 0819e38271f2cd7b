//! igreply server
//!
//! Receives Instagram messaging webhooks, logs every delivery to a daily
//! file and answers inbound messages with a fixed text.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use igreply_core::env::SystemEnv;
use server::{build_router, run_server};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// igreply - Instagram webhook receiver and auto-responder
#[derive(Parser, Debug)]
#[command(name = "igreply-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "IGREPLY_CONFIG", default_value = "./igreply.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long, env = "IGREPLY_LISTEN")]
    listen: Option<SocketAddr>,

    /// Override the directory for daily webhook logs
    #[arg(long, env = "IGREPLY_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    init_tracing();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting igreply-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.listen, args.log_dir);
    let loaded_config = config_loader.load(&SystemEnv).map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    tracing::info!(
        accounts = loaded_config.accounts.len(),
        log_dir = %loaded_config.webhook.log_dir.display(),
        "Configuration loaded"
    );

    let listen_addr = loaded_config.server.listen;

    // Create application state
    let state = AppState::new(&loaded_config, SystemEnv);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    run_server(router, listen_addr).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,igreply_core=debug,igreply_server=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
