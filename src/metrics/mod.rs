use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::{collections::BTreeMap, time::Duration};

pub mod tags;

pub use tags::{MetricTags, CUSTOMER_TAG};

use crate::observability::TelemetryConfig;

/// Content type of the Prometheus text exposition format
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// HTTP server metrics with a registry of their own
pub struct ServiceMetrics {
    registry: Registry,

    pub http_requests_total: IntCounterVec,
    pub http_request_duration: HistogramVec,
    pub http_active_requests: IntGaugeVec,

    pub document_outcomes_total: IntCounterVec,

    pub target_info: IntGauge,
}

impl ServiceMetrics {
    pub fn new(resource: &TelemetryConfig) -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new(
                "http_server_requests_total",
                "Total number of HTTP requests handled",
            ),
            &["method", "route", "status_code", CUSTOMER_TAG],
        )?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_server_request_duration_seconds",
                "Duration of HTTP server requests in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
            ]),
            &["method", "route", "status_code", CUSTOMER_TAG],
        )?;

        let http_active_requests = IntGaugeVec::new(
            Opts::new(
                "http_server_active_requests",
                "Number of HTTP requests currently being processed",
            ),
            &["method", "route"],
        )?;

        let document_outcomes_total = IntCounterVec::new(
            Opts::new(
                "document_outcomes_total",
                "Simulated document operation outcomes",
            ),
            &["operation", "outcome"],
        )?;

        let target_info = IntGauge::with_opts(
            Opts::new("target_info", "Target metadata")
                .const_label("service_name", &resource.service_name)
                .const_label("service_version", &resource.service_version),
        )?;
        target_info.set(1);

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(http_active_requests.clone()))?;
        registry.register(Box::new(document_outcomes_total.clone()))?;
        registry.register(Box::new(target_info.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration,
            http_active_requests,
            document_outcomes_total,
            target_info,
        })
    }

    /// Record a finished HTTP request. `tags` are the per-request dimensions
    /// collected by inner middleware.
    ///
    /// A vector's label set is fixed at registration, so a request without a
    /// customer is recorded with `customer=""`. In the Prometheus data model
    /// an empty label value is the same as the label not being present, so
    /// such series carry no customer dimension when queried.
    pub fn record_http_request(
        &self,
        method: &str,
        route: &str,
        status: u16,
        tags: &BTreeMap<String, String>,
        duration: Duration,
    ) {
        let status = status.to_string();
        let customer = tags.get(CUSTOMER_TAG).map(String::as_str).unwrap_or("");
        let labels = [method, route, status.as_str(), customer];

        self.http_requests_total.with_label_values(&labels).inc();
        self.http_request_duration
            .with_label_values(&labels)
            .observe(duration.as_secs_f64());
    }

    pub fn record_outcome(&self, operation: &str, outcome: &str) {
        self.document_outcomes_total
            .with_label_values(&[operation, outcome])
            .inc();
    }

    /// Count a request as in flight until the returned guard is dropped
    pub fn track_active(&self, method: &str, route: &str) -> ActiveRequestGuard {
        let gauge = self.http_active_requests.with_label_values(&[method, route]);
        gauge.inc();
        ActiveRequestGuard { gauge }
    }

    /// Render all metrics in Prometheus text format
    pub fn gather_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct ActiveRequestGuard {
    gauge: IntGauge,
}

impl Drop for ActiveRequestGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
