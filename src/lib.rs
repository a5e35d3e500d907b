// Library exports for some-service
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod loadgen;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod openapi;
pub mod simulation;

use anyhow::Result;
use std::sync::Arc;

// Re-export commonly used types
pub use app::build_router;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use metrics::ServiceMetrics;
pub use simulation::{DocumentSimulator, RandomSource};

/// Shared state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub simulator: DocumentSimulator,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let simulator = DocumentSimulator::from_config(&config.simulation);
        Self::with_simulator(config, simulator)
    }

    /// Build state around an explicit random source
    pub fn with_random(config: Config, random: Arc<dyn RandomSource>) -> Result<Self> {
        let simulator = DocumentSimulator::new(&config.simulation, random);
        Self::with_simulator(config, simulator)
    }

    fn with_simulator(config: Config, simulator: DocumentSimulator) -> Result<Self> {
        let metrics = ServiceMetrics::new(&config.telemetry)?;

        Ok(Self {
            config: Arc::new(config),
            simulator,
            metrics: Arc::new(metrics),
        })
    }
}
