use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use encore_core::{
    load_config, validate_config, ConcertPipeline, MusicProvider, SpotifyClient,
    TicketingProvider, TicketmasterClient,
};
use encore_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let json_logs = std::env::var("ENCORE_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Determine config path
    let config_path = std::env::var("ENCORE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Pipeline: {}ms between ticketing calls, bucketing cap {}",
        config.pipeline.request_delay_ms, config.pipeline.max_bucket_iterations
    );

    // Create upstream clients
    let spotify =
        SpotifyClient::new(config.spotify.clone()).context("Failed to create Spotify client")?;
    let authorize_url = spotify.authorize_url();
    info!("Spotify client initialized");

    let ticketmaster = TicketmasterClient::new(config.ticketmaster.clone())
        .context("Failed to create Ticketmaster client")?;
    info!("Ticketmaster client initialized");

    let music: Arc<dyn MusicProvider> = Arc::new(spotify);
    let ticketing: Arc<dyn TicketingProvider> = Arc::new(ticketmaster);
    let pipeline = Arc::new(ConcertPipeline::new(
        config.pipeline.clone(),
        music,
        ticketing,
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), pipeline, authorize_url));

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
