//! Scenario-driven load driver for the document endpoints.
//!
//! Each scenario owns a pool of virtual users (VUs) whose size follows a
//! ramping schedule. VUs loop a single action (fetch or upsert) tagged with
//! the scenario's customer header and never inspect response bodies.

pub mod action;
pub mod runner;
pub mod scenario;
pub mod stats;
pub mod target;

pub use action::{Action, PlannedRequest};
pub use runner::{LoadRunner, RunnerOptions};
pub use scenario::{default_scenarios, Executor, Scenario, Stage};
pub use stats::{RunSummary, ScenarioSummary};
pub use target::Target;

/// Load driver setup errors
#[derive(Debug, thiserror::Error)]
pub enum LoadTestError {
    #[error("Invalid target address: {0}")]
    InvalidTarget(String),

    #[error("Invalid port '{0}'")]
    InvalidPort(String),

    #[error("Unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("Time scale must be a positive finite number, got {0}")]
    InvalidTimeScale(f64),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Keep only the scenarios named in `names` (all of them when `names` is
/// empty) and rescale their schedules by `time_scale`.
pub fn select_scenarios(
    scenarios: Vec<Scenario>,
    names: &[String],
    time_scale: f64,
) -> Result<Vec<Scenario>, LoadTestError> {
    if !time_scale.is_finite() || time_scale <= 0.0 {
        return Err(LoadTestError::InvalidTimeScale(time_scale));
    }

    if let Some(unknown) = names
        .iter()
        .find(|name| !scenarios.iter().any(|s| &s.name == *name))
    {
        return Err(LoadTestError::UnknownScenario(unknown.clone()));
    }

    scenarios
        .into_iter()
        .filter(|s| names.is_empty() || names.contains(&s.name))
        .map(|s| {
            if time_scale == 1.0 {
                Ok(s)
            } else {
                s.scaled(time_scale)
            }
        })
        .collect()
}
