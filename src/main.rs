//! focust-dev: a local development server for the Focust web client.
//!
//! This is the application entry point. It loads configuration from a TOML
//! file, applies CLI overrides, initializes tracing, resolves the plugin
//! pipeline, builds the Axum router, and starts the HTTP(S) server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use focust_dev::config::{DevConfig, HostBinding, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use focust_dev::http::start_server;
use focust_dev::plugins::build_chain;
use focust_dev::routes::create_router;
use focust_dev::state::AppState;

/// focust-dev: a local development server for the Focust web client
#[derive(Parser, Debug)]
#[command(name = "focust-dev", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "focust_dev=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Listen port (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind all interfaces instead of loopback
    #[arg(long)]
    host: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration and apply CLI overrides (CLI > file)
    let mut config = DevConfig::load(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = Some(port);
    }
    if args.host {
        config.server.host = HostBinding::Open(true);
    }

    // Initialize tracing with filter priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        addr = %config.server.bind_addr(),
        tls_mode = ?config.server.tls.mode,
        assets = %config.assets.root,
        "Loaded configuration"
    );

    // Resolve the plugin pipeline
    let chain = build_chain(&config.plugins)?;
    tracing::info!(plugins = ?chain.names(), "Initialized plugin pipeline");

    // Create application state and router
    let state = AppState::new(config.clone(), chain);
    let app = create_router(state)?;

    // Start server (blocks until shutdown)
    start_server(app, &config).await?;

    Ok(())
}
