use anyhow::{Context, Result};
use tracing::{info, warn};

use some_service::{
    build_router,
    config::{Config, ConfigValidator},
    observability::init_logging,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env_and_file()?;

    // Initialize tracing
    init_logging(&config.logging)?;
    config.telemetry.announce();

    ConfigValidator::validate_basic(&config)?;
    info!("Configuration loaded successfully");

    if config.simulation.seed.is_some() {
        warn!("Simulation seed is set; outcomes are reproducible across restarts");
    }
    if config.monitoring.metrics {
        info!(
            "Prometheus metrics exposed at {}",
            config.monitoring.metrics_path
        );
    }

    let bind_address = config.server.bind_address();
    let app_state = AppState::new(config)?;
    let app = build_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
