use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

/// Dimension name the customer header is recorded under
pub const CUSTOMER_TAG: &str = "customer";

/// Per-request set of extra metric dimensions.
///
/// The metrics middleware inserts a fresh set into the request extensions
/// before calling inner middleware, and reads it back once the response is
/// produced. Inner middleware add dimensions through a cloned handle.
#[derive(Debug, Clone, Default)]
pub struct MetricTags {
    inner: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MetricTags {
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        // Tags are plain data; a panicking writer cannot leave them half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
