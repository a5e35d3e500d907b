use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Half-open millisecond range `[min, max)` a simulated delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    pub fn contains(&self, delay: Duration) -> bool {
        delay >= Duration::from_millis(self.min) && delay < Duration::from_millis(self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub fetch_delay_ms: DelayRange,
    pub upsert_delay_ms: DelayRange,
    /// Fixed seed for reproducible outcome sequences
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: DelayRange::new(10, 100),
            upsert_delay_ms: DelayRange::new(100, 500),
            seed: None,
        }
    }
}
