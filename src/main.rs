//! asset-view server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────▶ http::server (one route per asset spec)
//!               │
//!               ▼
//!             http::handler ──▶ assets::view ──▶ security::path
//!               │                    │
//!               │                    ├──▶ assets::resolver ──▶ assets::store
//!               │                    ├──▶ assets::etag (If-None-Match → 304)
//!               │                    └──▶ assets::render (templates)
//!               ▼
//!     ◀────── http::response (Content-Type, ETag, streamed body)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use asset_view::assets::PassthroughRenderer;
use asset_view::config::{load_config, AssetServerConfig};
use asset_view::http::AssetServer;
use asset_view::lifecycle::{build_registry, signals, Shutdown};
use asset_view::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "asset-view")]
#[command(about = "Serve package assets with cache regions and ETags", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AssetServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("asset-view v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        packages = config.packages.len(),
        assets = config.assets.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let registry = Arc::new(build_registry(&config, Arc::new(PassthroughRenderer))?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_handler(shutdown.clone());

    let server = AssetServer::new(&config, registry);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
