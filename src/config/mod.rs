use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, path::Path};

pub mod server;
pub mod simulation;
pub mod validator;

use crate::observability::{LogFormat, LoggingConfig, TelemetryConfig};
use server::ServerConfig;
use simulation::SimulationConfig;

pub use validator::ConfigValidator;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub monitoring: MonitoringConfig,
    pub logging: LoggingConfig,
    pub telemetry: TelemetryConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub metrics: bool,
    pub metrics_path: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            metrics: true,
            metrics_path: "/metrics".to_string(),
        }
    }
}

impl Config {
    pub fn from_env_and_file() -> Result<Self> {
        // Load from config.yml if it exists
        let mut config = if Path::new("config.yml").exists() {
            Self::from_file("config.yml")?
        } else {
            Config::default()
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&config_str).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str::<Config>(source)?)
    }

    /// Apply `SERVER_*`, `LOG_*`, `METRICS_ENABLED` and `SIMULATION_SEED`
    /// overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port.parse().context("Invalid SERVER_PORT")?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = format
                .parse::<LogFormat>()
                .map_err(anyhow::Error::msg)
                .context("Invalid LOG_FORMAT")?;
        }

        if let Some(metrics) = lookup("METRICS_ENABLED") {
            self.monitoring.metrics = metrics.parse().context("Invalid METRICS_ENABLED")?;
        }

        if let Some(seed) = lookup("SIMULATION_SEED") {
            self.simulation.seed = Some(seed.parse().context("Invalid SIMULATION_SEED")?);
        }

        Ok(())
    }
}
