use serde::{Deserialize, Serialize};

/// Resource metadata attached to logs and exported as `target_info`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name reported on every signal
    pub service_name: String,
    /// Service version reported on every signal
    pub service_version: String,
    /// Environment (development, staging, production, testing)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "some-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Log the resource once at startup so every log stream can be correlated
    pub fn announce(&self) {
        tracing::info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Telemetry resource configured"
        );
    }
}
