use rand::{rngs::StdRng, SeedableRng};
use reqwest::Client;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info};

use super::{
    action::PlannedRequest,
    scenario::Scenario,
    stats::{RunSummary, ScenarioStats, ScenarioSummary},
    target::Target,
    LoadTestError,
};
use crate::middleware::CUSTOMER_HEADER;

#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// How often each scenario controller re-evaluates its VU target
    pub tick: Duration,
    /// Seed for reproducible document id draws
    pub seed: Option<u64>,
    pub request_timeout: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            seed: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Runs scenarios concurrently against one target
#[derive(Clone)]
pub struct LoadRunner {
    client: Client,
    target: Arc<Target>,
    options: RunnerOptions,
}

/// Everything a VU needs, shared across the VUs of one scenario
struct VuContext {
    client: Client,
    target: Arc<Target>,
    scenario: Arc<Scenario>,
    stats: Arc<ScenarioStats>,
}

impl LoadRunner {
    pub fn new(target: Target, options: RunnerOptions) -> Result<Self, LoadTestError> {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self {
            client,
            target: Arc::new(target),
            options,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run every scenario to completion, concurrently and independently
    pub async fn run(&self, scenarios: Vec<Scenario>) -> RunSummary {
        let started = Instant::now();

        let handles: Vec<(String, JoinHandle<ScenarioSummary>)> = scenarios
            .into_iter()
            .enumerate()
            .map(|(index, scenario)| {
                let name = scenario.name.clone();
                let runner = self.clone();
                let handle = tokio::spawn(async move { runner.run_scenario(index, scenario).await });
                (name, handle)
            })
            .collect();

        let mut summary = RunSummary::default();
        for (name, handle) in handles {
            match handle.await {
                Ok(scenario_summary) => summary.scenarios.push(scenario_summary),
                Err(e) => error!(scenario = %name, "Scenario task failed: {}", e),
            }
        }

        summary.elapsed = started.elapsed();
        summary
    }

    async fn run_scenario(&self, index: usize, scenario: Scenario) -> ScenarioSummary {
        info!(
            scenario = %scenario.name,
            customer = %scenario.customer,
            max_vus = scenario.max_vus(),
            duration_secs = scenario.total_duration().as_secs_f64(),
            "Starting scenario"
        );

        let stats = Arc::new(ScenarioStats::default());
        let context = Arc::new(VuContext {
            client: self.client.clone(),
            target: self.target.clone(),
            scenario: Arc::new(scenario),
            stats: stats.clone(),
        });

        let (active_tx, active_rx) = watch::channel(context.scenario.start_vus);
        let mut vus: Vec<JoinHandle<()>> = Vec::new();

        let mut ticker = interval(self.options.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let started = Instant::now();

        loop {
            ticker.tick().await;

            let Some(target) = context.scenario.target_at(started.elapsed()) else {
                break;
            };

            // VUs are created lazily and kept; ramp-down only parks them.
            while (vus.len() as u32) < target {
                let vu_index = vus.len() as u32;
                let rng = self.vu_rng(index, vu_index);
                vus.push(tokio::spawn(run_vu(
                    vu_index,
                    active_rx.clone(),
                    context.clone(),
                    rng,
                )));
            }

            let current = *active_tx.borrow();
            if current != target {
                debug!(scenario = %context.scenario.name, active_vus = target, "Adjusting VUs");
                active_tx.send_replace(target);
            }
            stats.observe_vus(target);
        }

        active_tx.send_replace(0);
        drop(active_tx);
        drop(active_rx);

        for vu in vus {
            if let Err(e) = vu.await {
                error!(scenario = %context.scenario.name, "VU task failed: {}", e);
            }
        }

        let summary = stats.summary(&context.scenario.name);
        info!(
            scenario = %summary.name,
            requests = summary.requests,
            "Scenario finished"
        );
        summary
    }

    fn vu_rng(&self, scenario_index: usize, vu_index: u32) -> StdRng {
        match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(
                seed ^ ((scenario_index as u64) << 32) ^ u64::from(vu_index),
            ),
            None => StdRng::from_entropy(),
        }
    }
}

/// One virtual user: loop the scenario's action while inside the active set
async fn run_vu(
    index: u32,
    mut active: watch::Receiver<u32>,
    context: Arc<VuContext>,
    mut rng: StdRng,
) {
    let grace = context.scenario.graceful_ramp_down;

    loop {
        if !wait_until_active(&mut active, index).await {
            return;
        }

        let request = context.scenario.action.next_request(&mut rng);
        let iteration = execute(&context, request);
        tokio::pin!(iteration);

        let finished = tokio::select! {
            _ = &mut iteration => true,
            _ = wait_until_inactive(&mut active, index) => false,
        };

        // Ramped down mid-iteration: interrupt, or let it finish within the grace window.
        if !finished && !grace.is_zero() {
            let _ = tokio::time::timeout(grace, &mut iteration).await;
        }
    }
}

/// Resolves `true` once VU `index` is active, `false` when the scenario ended
async fn wait_until_active(active: &mut watch::Receiver<u32>, index: u32) -> bool {
    loop {
        let current = *active.borrow_and_update();
        if current > index {
            return true;
        }
        if active.changed().await.is_err() {
            return false;
        }
    }
}

async fn wait_until_inactive(active: &mut watch::Receiver<u32>, index: u32) {
    loop {
        let current = *active.borrow_and_update();
        if current <= index {
            return;
        }
        if active.changed().await.is_err() {
            return;
        }
    }
}

/// Send one request; the body is discarded and only the status is counted
async fn execute(context: &VuContext, request: PlannedRequest) {
    let builder = match request {
        PlannedRequest::Get { document_id } => {
            context.client.get(context.target.document_url(document_id))
        }
        PlannedRequest::Put { payload } => {
            context.client.put(context.target.documents_url()).json(&payload)
        }
    };

    let started = Instant::now();
    match builder
        .header(CUSTOMER_HEADER, context.scenario.customer.as_str())
        .send()
        .await
    {
        Ok(response) => {
            context
                .stats
                .record_response(response.status().as_u16(), started.elapsed());
        }
        Err(e) => {
            debug!(scenario = %context.scenario.name, "Request failed: {}", e);
            context.stats.record_transport_error(started.elapsed());
        }
    }
}
