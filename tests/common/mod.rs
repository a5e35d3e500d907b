#![allow(dead_code)]

use axum::{body::Body, http::Response, Router};
use some_service::{
    build_router,
    config::simulation::DelayRange,
    AppState, Config, RandomSource,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// Random source that replays a fixed sequence of draws.
///
/// Once the script runs out every draw returns the low end of its range.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    draws: Mutex<VecDeque<i64>>,
}

impl ScriptedRandom {
    pub fn new(draws: &[i64]) -> Arc<Self> {
        Arc::new(Self {
            draws: Mutex::new(draws.iter().copied().collect()),
        })
    }

    pub fn remaining(&self) -> usize {
        self.draws.lock().unwrap().len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_in(&self, low: i64, high: i64) -> i64 {
        let draw = self.draws.lock().unwrap().pop_front().unwrap_or(low);
        assert!(
            low <= draw && (draw < high || low >= high),
            "scripted draw {draw} outside [{low}, {high})"
        );
        draw
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.telemetry.environment = "testing".to_string();
    config
}

/// Config whose delays are effectively zero, for runs on the real clock
pub fn fast_config() -> Config {
    let mut config = test_config();
    config.simulation.fetch_delay_ms = DelayRange::new(0, 1);
    config.simulation.upsert_delay_ms = DelayRange::new(0, 1);
    config
}

/// Router backed by scripted draws, along with its state and the script
pub fn scripted_app(draws: &[i64]) -> (Router, AppState, Arc<ScriptedRandom>) {
    let random = ScriptedRandom::new(draws);
    let state = AppState::with_random(test_config(), random.clone())
        .expect("Failed to build app state");
    (build_router(state.clone()), state, random)
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("Body is not JSON")
}
