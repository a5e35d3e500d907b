//! Randomized latency and outcome selection for the document endpoints.
//!
//! Each call sleeps for a delay drawn from the configured range, then draws
//! an integer from `[100, 500]`. A handful of reserved draws map to error
//! statuses; every other draw succeeds.

use std::{sync::Arc, time::Duration};
use tracing::debug;

pub mod random;

pub use random::{RandomSource, SeededRandom, ThreadRandom};

use crate::{
    config::simulation::{DelayRange, SimulationConfig},
    errors::{AppError, AppResult},
    models::{Document, UpsertedDocument},
};

/// Lowest outcome draw (inclusive)
pub const OUTCOME_DRAW_MIN: i64 = 100;
/// Highest outcome draw (inclusive)
pub const OUTCOME_DRAW_MAX: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Upsert,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Upsert => "upsert",
        }
    }

    /// Error selected by a reserved draw, `None` for every other value
    pub fn reserved_failure(self, draw: i64) -> Option<AppError> {
        match (self, draw) {
            (_, 400) => Some(AppError::BadRequest),
            (Operation::Fetch, 401) => Some(AppError::Unauthorized),
            (Operation::Fetch, 404) => Some(AppError::NotFound),
            (Operation::Upsert, 403) => Some(AppError::Forbidden),
            (Operation::Upsert, 409) => Some(AppError::Conflict),
            (_, 500) => Some(AppError::Internal),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct DocumentSimulator {
    random: Arc<dyn RandomSource>,
    fetch_delay: DelayRange,
    upsert_delay: DelayRange,
}

impl DocumentSimulator {
    pub fn new(config: &SimulationConfig, random: Arc<dyn RandomSource>) -> Self {
        Self {
            random,
            fetch_delay: config.fetch_delay_ms,
            upsert_delay: config.upsert_delay_ms,
        }
    }

    /// Build a simulator from config: seeded when `seed` is set, thread-local otherwise
    pub fn from_config(config: &SimulationConfig) -> Self {
        let random: Arc<dyn RandomSource> = match config.seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        };
        Self::new(config, random)
    }

    pub async fn fetch(&self, document_id: i32) -> AppResult<Document> {
        self.pause(self.fetch_delay).await;

        match Operation::Fetch.reserved_failure(self.draw_outcome()) {
            Some(error) => Err(error),
            None => Ok(Document::synthesize(document_id)),
        }
    }

    pub async fn upsert(&self) -> AppResult<UpsertedDocument> {
        self.pause(self.upsert_delay).await;

        match Operation::Upsert.reserved_failure(self.draw_outcome()) {
            Some(error) => Err(error),
            None => Ok(UpsertedDocument {
                id: self.random.next_in(0, i64::from(i32::MAX)) as i32,
            }),
        }
    }

    async fn pause(&self, range: DelayRange) {
        let low = i64::try_from(range.min).unwrap_or(i64::MAX);
        let high = i64::try_from(range.max).unwrap_or(i64::MAX);
        let delay_ms = self.random.next_in(low, high).max(0) as u64;

        debug!(delay_ms, "Simulating latency");
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    fn draw_outcome(&self) -> i64 {
        self.random.next_in(OUTCOME_DRAW_MIN, OUTCOME_DRAW_MAX + 1)
    }
}
