use anyhow::{anyhow, Result};

use crate::{
    app::{DOCUMENTS_PREFIX, SYSTEM_PATHS},
    config::Config,
};

/// Configuration validator run once at startup
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration for any environment
    pub fn validate_basic(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_server(config, &mut errors);
        Self::validate_simulation(config, &mut errors);
        Self::validate_monitoring(config, &mut errors);

        if !errors.is_empty() {
            return Err(anyhow!(
                "Basic configuration validation failed:\n{}",
                errors.join("\n")
            ));
        }

        Ok(())
    }

    fn validate_server(config: &Config, errors: &mut Vec<String>) {
        if config.server.host.is_empty() {
            errors.push("Server host cannot be empty".to_string());
        }

        if config.server.port == 0 && config.telemetry.environment != "testing" {
            errors.push("Server port must be specified (non-zero)".to_string());
        }
    }

    fn validate_simulation(config: &Config, errors: &mut Vec<String>) {
        let simulation = &config.simulation;

        if simulation.fetch_delay_ms.is_empty() {
            errors.push(format!(
                "Fetch delay range is empty ({}..{}ms)",
                simulation.fetch_delay_ms.min, simulation.fetch_delay_ms.max
            ));
        }

        if simulation.upsert_delay_ms.is_empty() {
            errors.push(format!(
                "Upsert delay range is empty ({}..{}ms)",
                simulation.upsert_delay_ms.min, simulation.upsert_delay_ms.max
            ));
        }
    }

    fn validate_monitoring(config: &Config, errors: &mut Vec<String>) {
        let metrics_path = config.monitoring.metrics_path.as_str();
        if config.monitoring.metrics && !metrics_path.starts_with('/') {
            errors.push("Metrics path must start with '/'".to_string());
        }

        // The scrape route is registered even with metrics disabled.
        if SYSTEM_PATHS.contains(&metrics_path) || metrics_path.starts_with(DOCUMENTS_PREFIX) {
            errors.push(format!(
                "Metrics path '{metrics_path}' collides with a built-in route"
            ));
        }

        if config.telemetry.service_name.is_empty() {
            errors.push("Service name cannot be empty".to_string());
        }
    }
}
