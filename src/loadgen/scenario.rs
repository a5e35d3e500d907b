use std::time::Duration;

use super::{action::Action, LoadTestError};

/// One ramp stage: move linearly to `target` VUs over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub duration: Duration,
    pub target: u32,
}

impl Stage {
    pub const fn new(duration: Duration, target: u32) -> Self {
        Self { duration, target }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Executor {
    /// Vary the number of looping VUs according to the stage list
    RampingVus,
}

/// A named traffic scenario bound to one action and one customer
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub executor: Executor,
    pub customer: String,
    pub action: Action,
    pub start_vus: u32,
    pub stages: Vec<Stage>,
    /// How long a ramped-down VU may finish its in-flight iteration
    pub graceful_ramp_down: Duration,
}

impl Scenario {
    pub fn ramping(
        name: impl Into<String>,
        customer: impl Into<String>,
        action: Action,
        stages: Vec<Stage>,
    ) -> Self {
        Self {
            name: name.into(),
            executor: Executor::RampingVus,
            customer: customer.into(),
            action,
            start_vus: 0,
            stages,
            graceful_ramp_down: Duration::ZERO,
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.duration).sum()
    }

    /// Highest VU count the schedule ever asks for
    pub fn max_vus(&self) -> u32 {
        self.stages
            .iter()
            .map(|stage| stage.target)
            .fold(self.start_vus, u32::max)
    }

    /// Active VU count at `elapsed` since scenario start, `None` once the
    /// last stage has ended.
    ///
    /// Within a stage the count moves linearly from the previous target (or
    /// `start_vus`) to the stage target and is rounded down.
    pub fn target_at(&self, elapsed: Duration) -> Option<u32> {
        let mut from = f64::from(self.start_vus);
        let mut stage_start = Duration::ZERO;

        for stage in &self.stages {
            let stage_end = stage_start + stage.duration;
            if elapsed < stage_end {
                let progress =
                    (elapsed - stage_start).as_secs_f64() / stage.duration.as_secs_f64();
                let value = from + (f64::from(stage.target) - from) * progress;
                return Some(value.floor().max(0.0) as u32);
            }
            from = f64::from(stage.target);
            stage_start = stage_end;
        }

        None
    }

    /// Same schedule with every duration multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Result<Self, LoadTestError> {
        let scale = |duration: Duration| {
            Duration::try_from_secs_f64(duration.as_secs_f64() * factor)
                .map_err(|_| LoadTestError::InvalidTimeScale(factor))
        };

        let mut scaled = self.clone();
        for stage in &mut scaled.stages {
            stage.duration = scale(stage.duration)?;
        }
        scaled.graceful_ramp_down = scale(scaled.graceful_ramp_down)?;

        // Stage durations are summed while running.
        if scaled.stages.iter().try_fold(Duration::ZERO, |total, stage| {
            total.checked_add(stage.duration)
        })
        .is_none()
        {
            return Err(LoadTestError::InvalidTimeScale(factor));
        }

        Ok(scaled)
    }
}

const fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

const fn seconds(n: u64) -> Duration {
    Duration::from_secs(n)
}

/// The four concurrent scenarios: a read and a write stream per customer,
/// with disjoint document id ranges for the two readers.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::ramping(
            "first_get",
            "first",
            Action::get_document(1, 99_999),
            vec![
                Stage::new(minutes(1), 20),
                Stage::new(minutes(2), 0),
                Stage::new(minutes(1), 10),
                Stage::new(minutes(1), 0),
            ],
        ),
        Scenario::ramping(
            "first_put",
            "first",
            Action::put_document(),
            vec![
                Stage::new(minutes(4), 5),
                Stage::new(seconds(30), 10),
                Stage::new(seconds(30), 0),
            ],
        ),
        Scenario::ramping(
            "second_get",
            "second",
            Action::get_document(100_000, 200_000),
            vec![
                Stage::new(minutes(2), 25),
                Stage::new(minutes(1), 5),
                Stage::new(minutes(1), 15),
                Stage::new(minutes(1), 0),
            ],
        ),
        Scenario::ramping(
            "second_put",
            "second",
            Action::put_document(),
            vec![
                Stage::new(minutes(4), 7),
                Stage::new(seconds(30), 15),
                Stage::new(seconds(30), 0),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(stages: Vec<Stage>) -> Scenario {
        Scenario::ramping("test", "first", Action::put_document(), stages)
    }

    #[test]
    fn test_linear_ramp_up_and_down() {
        let scenario = scenario(vec![
            Stage::new(seconds(10), 20),
            Stage::new(seconds(10), 0),
        ]);

        assert_eq!(scenario.target_at(Duration::ZERO), Some(0));
        assert_eq!(scenario.target_at(seconds(5)), Some(10));
        assert_eq!(scenario.target_at(Duration::from_millis(9_999)), Some(19));
        assert_eq!(scenario.target_at(seconds(10)), Some(20));
        assert_eq!(scenario.target_at(seconds(15)), Some(10));
        assert_eq!(scenario.target_at(Duration::from_millis(19_999)), Some(0));
        assert_eq!(scenario.target_at(seconds(20)), None);
    }

    #[test]
    fn test_start_vus_is_ramp_origin() {
        let mut scenario = scenario(vec![Stage::new(seconds(10), 0)]);
        scenario.start_vus = 10;

        assert_eq!(scenario.target_at(Duration::ZERO), Some(10));
        assert_eq!(scenario.target_at(seconds(5)), Some(5));
    }

    #[test]
    fn test_zero_length_stage_jumps() {
        let scenario = scenario(vec![
            Stage::new(Duration::ZERO, 8),
            Stage::new(seconds(10), 8),
        ]);

        assert_eq!(scenario.target_at(Duration::ZERO), Some(8));
        assert_eq!(scenario.target_at(seconds(9)), Some(8));
    }

    #[test]
    fn test_empty_schedule_ends_immediately() {
        assert_eq!(scenario(Vec::new()).target_at(Duration::ZERO), None);
    }

    #[test]
    fn test_default_scenarios() {
        let scenarios = default_scenarios();
        let names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["first_get", "first_put", "second_get", "second_put"]);

        for scenario in &scenarios {
            assert_eq!(scenario.executor, Executor::RampingVus);
            assert_eq!(scenario.start_vus, 0);
            assert_eq!(scenario.graceful_ramp_down, Duration::ZERO);
            assert_eq!(scenario.total_duration(), minutes(5));
            assert_eq!(scenario.stages.last().map(|s| s.target), Some(0));
        }

        let peaks: Vec<u32> = scenarios.iter().map(Scenario::max_vus).collect();
        assert_eq!(peaks, [20, 10, 25, 15]);

        assert_eq!(scenarios[0].customer, "first");
        assert_eq!(scenarios[1].customer, "first");
        assert_eq!(scenarios[2].customer, "second");
        assert_eq!(scenarios[3].customer, "second");
    }

    #[test]
    fn test_scaled_schedule() {
        let scenario = default_scenarios().remove(1).scaled(0.5).unwrap();

        assert_eq!(scenario.stages[0].duration, minutes(2));
        assert_eq!(scenario.stages[1].duration, seconds(15));
        assert_eq!(scenario.total_duration(), seconds(150));
        assert_eq!(scenario.max_vus(), 10);
    }

    #[test]
    fn test_scaled_schedule_out_of_range() {
        let scenario = default_scenarios().remove(0);

        assert!(matches!(
            scenario.scaled(1e20),
            Err(LoadTestError::InvalidTimeScale(factor)) if factor == 1e20
        ));
        assert!(scenario.scaled(f64::MAX).is_err());
    }
}
