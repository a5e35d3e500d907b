use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU32, AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};
use tracing::info;

/// Counters shared by every VU of one scenario
#[derive(Debug, Default)]
pub struct ScenarioStats {
    requests: AtomicU64,
    transport_errors: AtomicU64,
    total_latency_micros: AtomicU64,
    peak_vus: AtomicU32,
    statuses: Mutex<BTreeMap<u16, u64>>,
}

impl ScenarioStats {
    pub fn record_response(&self, status: u16, latency: Duration) {
        self.record_latency(latency);
        let mut statuses = self
            .statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *statuses.entry(status).or_insert(0) += 1;
    }

    pub fn record_transport_error(&self, latency: Duration) {
        self.record_latency(latency);
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_vus(&self, active: u32) {
        self.peak_vus.fetch_max(active, Ordering::Relaxed);
    }

    fn record_latency(&self, latency: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.total_latency_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn summary(&self, name: &str) -> ScenarioSummary {
        let requests = self.requests.load(Ordering::Relaxed);
        let total_latency = self.total_latency_micros.load(Ordering::Relaxed);
        let mean_latency = if requests == 0 {
            Duration::ZERO
        } else {
            Duration::from_micros(total_latency / requests)
        };

        ScenarioSummary {
            name: name.to_string(),
            requests,
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            statuses: self
                .statuses
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
            mean_latency,
            peak_vus: self.peak_vus.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub name: String,
    /// Every attempted request, including transport failures
    pub requests: u64,
    pub transport_errors: u64,
    pub statuses: BTreeMap<u16, u64>,
    pub mean_latency: Duration,
    pub peak_vus: u32,
}

impl ScenarioSummary {
    pub fn responses(&self) -> u64 {
        self.statuses.values().sum()
    }

    pub fn count_for(&self, status: u16) -> u64 {
        self.statuses.get(&status).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub scenarios: Vec<ScenarioSummary>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total_requests(&self) -> u64 {
        self.scenarios.iter().map(|s| s.requests).sum()
    }

    pub fn scenario(&self, name: &str) -> Option<&ScenarioSummary> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn log(&self) {
        info!(
            "Load test finished: {} requests in {:.1}s",
            self.total_requests(),
            self.elapsed.as_secs_f64()
        );

        for scenario in &self.scenarios {
            info!(
                scenario = %scenario.name,
                requests = scenario.requests,
                transport_errors = scenario.transport_errors,
                peak_vus = scenario.peak_vus,
                mean_latency_ms = scenario.mean_latency.as_secs_f64() * 1000.0,
                statuses = ?scenario.statuses,
                "Scenario summary"
            );
        }
    }
}
