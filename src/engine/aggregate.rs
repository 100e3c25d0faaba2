//! Folding per-truck outcomes into a [`FleetResult`].

use chrono::{DateTime, Utc};

use crate::model::{Failure, FleetResult, Outcome, Phase, RunId};

/// Accumulates outcomes in arrival order.
#[derive(Debug)]
pub struct ResultAggregator {
    run_id: RunId,
    started_at: DateTime<Utc>,
    total: usize,
    failures: Vec<Failure>,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(RunId::new(), Utc::now())
    }
}

impl ResultAggregator {
    pub fn new(run_id: RunId, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            total: 0,
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        let Err(error) = outcome.result else {
            return;
        };
        // Anything outside the per-truck taxonomy can only come from the
        // worker itself.
        let phase = Phase::of(&error).unwrap_or(Phase::Worker);
        self.failures.push(Failure {
            truck_id: outcome.truck_id,
            phase,
            message: error.to_string(),
        });
    }

    pub fn finish(self) -> FleetResult {
        FleetResult {
            run_id: self.run_id,
            started_at: self.started_at,
            total: self.total,
            failure_count: self.failures.len(),
            failures: self.failures,
        }
    }
}

/// Summarise a batch of outcomes under a fresh run id.
pub fn aggregate(outcomes: impl IntoIterator<Item = Outcome>) -> FleetResult {
    let mut aggregator = ResultAggregator::default();
    for outcome in outcomes {
        aggregator.record(outcome);
    }
    aggregator.finish()
}
