use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use super::TelemetryConfig;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or full filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Log format (json, pretty, compact)
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!(
                "Invalid log format '{other}'. Use 'json', 'pretty' or 'compact'."
            )),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "some_service=info,tower_http=warn".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Structured logging context for requests
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub request_id: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub customer: Option<String>,
    pub method: String,
    pub path: String,
    #[serde(skip)]
    pub start_time: std::time::Instant,
}

impl RequestContext {
    pub fn new(request_id: String, ip_address: String, method: String, path: String) -> Self {
        Self {
            request_id,
            ip_address,
            user_agent: None,
            customer: None,
            method,
            path,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_customer(mut self, customer: Option<String>) -> Self {
        self.customer = customer;
        self
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

/// Initialize structured logging to stdout
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_timer(ChronoUtc::rfc_3339()))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact().with_timer(ChronoUtc::rfc_3339()))
            .try_init(),
    };

    result.map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

/// Log a completed request with structured context
pub fn log_request(ctx: &RequestContext, resource: &TelemetryConfig, status_code: u16) {
    let elapsed_ms = ctx.elapsed_ms();

    tracing::info!(
        service.name = %resource.service_name,
        service.version = %resource.service_version,
        request_id = %ctx.request_id,
        ip_address = %ctx.ip_address,
        user_agent = ?ctx.user_agent,
        customer = ?ctx.customer,
        method = %ctx.method,
        path = %ctx.path,
        status_code = status_code,
        elapsed_ms = elapsed_ms,
        "HTTP {} {} responded {} in {:.4} ms",
        ctx.method,
        ctx.path,
        status_code,
        elapsed_ms
    );
}
