use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Mutex;

/// Source of uniformly distributed integers.
///
/// Handlers hold this behind an `Arc<dyn RandomSource>` so tests can pin the
/// sequence of draws.
pub trait RandomSource: Send + Sync {
    /// Uniform draw from the half-open range `[low, high)`.
    /// Returns `low` when the range is empty.
    fn next_in(&self, low: i64, high: i64) -> i64;
}

/// Per-call thread-local generator; no state is shared between requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_in(&self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        rand::thread_rng().gen_range(low..high)
    }
}

/// Deterministic generator for reproducible runs
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_in(&self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(low..high)
    }
}
