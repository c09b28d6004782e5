//! Per-stage wall-clock timings of an analysis run

use std::fmt;
use std::time::{Duration, Instant};

use tracing::info;

/// Analysis stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Read,
    Locate,
    Parse,
    Unpack,
    Aggregate,
    Derive,
    Emit,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Read => "read",
            Stage::Locate => "locate",
            Stage::Parse => "parse",
            Stage::Unpack => "unpack",
            Stage::Aggregate => "aggregate",
            Stage::Derive => "derive",
            Stage::Emit => "emit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time spent per stage. Repeated stages (aggregate and derive run once per
/// channel) accumulate into a single entry, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PipelineTimings {
    stages: Vec<(Stage, Duration)>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` and charges its wall-clock time to `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.add(stage, start.elapsed());
        out
    }

    pub fn add(&mut self, stage: Stage, duration: Duration) {
        match self.stages.iter_mut().find(|(s, _)| *s == stage) {
            Some((_, total)) => *total += duration,
            None => self.stages.push((stage, duration)),
        }
    }

    /// Folds in timings recorded by another component, e.g. the decoder.
    pub fn merge(&mut self, other: &PipelineTimings) {
        for &(stage, duration) in &other.stages {
            self.add(stage, duration);
        }
    }

    pub fn get(&self, stage: Stage) -> Option<Duration> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|&(_, duration)| duration)
    }

    pub fn stages(&self) -> &[(Stage, Duration)] {
        &self.stages
    }

    pub fn total(&self) -> Duration {
        self.stages.iter().map(|&(_, d)| d).sum()
    }

    pub fn log_summary(&self) {
        let total = self.total().as_secs_f64();
        for &(stage, duration) in &self.stages {
            let share = if total > 0.0 {
                duration.as_secs_f64() / total * 100.0
            } else {
                0.0
            };
            info!(stage = %stage, "{:>10.3}ms ({:>5.1}%)", duration.as_secs_f64() * 1000.0, share);
        }
        info!("total {:>10.3}ms", total * 1000.0);
    }
}
