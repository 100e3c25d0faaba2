//! Core data model.
//!
//! A truck is the unit of work. Processing one truck yields an [`Outcome`];
//! a fleet run folds every outcome into a [`FleetResult`].

pub mod truck;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

pub use truck::{CARGO_BATCH, ElectricTruck, NormalTruck, Truck, TruckRef};

// ---------------------------------------------------------------------------
// Run identity
// ---------------------------------------------------------------------------

/// Newtype for fleet run IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where in the protocol a truck failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// `load_cargo` returned an error; unload was never attempted.
    Load,
    /// `unload_cargo` returned an error.
    Unload,
    /// The per-truck deadline fired first.
    Timeout,
    /// The batch deadline fired while the truck was still running.
    Cancelled,
    /// The worker task itself failed, e.g. it panicked.
    Worker,
}

impl Phase {
    /// The phase a per-truck error belongs to. `None` for errors that never
    /// come out of a worker.
    pub fn of(error: &Error) -> Option<Phase> {
        match error {
            Error::LoadFailed { .. } => Some(Phase::Load),
            Error::UnloadFailed { .. } => Some(Phase::Unload),
            Error::Timeout { .. } => Some(Phase::Timeout),
            Error::Cancelled { .. } => Some(Phase::Cancelled),
            Error::WorkerPanicked { .. } => Some(Phase::Worker),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Load => "load",
            Phase::Unload => "unload",
            Phase::Timeout => "timeout",
            Phase::Cancelled => "cancelled",
            Phase::Worker => "worker",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Terminal result of processing one truck.
#[derive(Debug)]
pub struct Outcome {
    pub truck_id: String,
    pub result: Result<()>,
    /// Wall time from task start to terminal state.
    pub duration_ms: u64,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Failing phase, or `None` on success.
    pub fn phase(&self) -> Option<Phase> {
        self.result.as_ref().err().and_then(Phase::of)
    }
}

/// A failed truck as reported in a [`FleetResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub truck_id: String,
    pub phase: Phase,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Fleet result
// ---------------------------------------------------------------------------

/// Summary of one fleet run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetResult {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub failure_count: usize,
    /// Failures in arrival order. Arrival order depends on scheduling, so
    /// only membership is stable across runs.
    pub failures: Vec<Failure>,
}

impl FleetResult {
    pub fn success_count(&self) -> usize {
        self.total - self.failure_count
    }

    /// Non-empty fleet with zero successes.
    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.failure_count == self.total
    }

    /// Failures recorded for one phase.
    pub fn failures_in(&self, phase: Phase) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(move |f| f.phase == phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CargoError;

    #[test]
    fn phase_follows_error_variant() {
        let load = Error::LoadFailed {
            truck_id: "NT1".into(),
            source: CargoError::Fault("jammed".into()),
        };
        let timeout = Error::Timeout {
            truck_id: "NT1".into(),
            after: std::time::Duration::from_millis(5),
        };
        assert_eq!(Phase::of(&load), Some(Phase::Load));
        assert_eq!(Phase::of(&timeout), Some(Phase::Timeout));
        assert_eq!(Phase::of(&Error::NotFound("x".into())), None);
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&Phase::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        assert_eq!(Phase::Unload.to_string(), "unload");
    }

    #[test]
    fn all_failed_requires_a_non_empty_fleet() {
        let mut result = FleetResult {
            run_id: RunId::new(),
            started_at: Utc::now(),
            total: 0,
            failure_count: 0,
            failures: vec![],
        };
        assert!(!result.all_failed());

        result.total = 2;
        result.failure_count = 2;
        assert!(result.all_failed());
        assert_eq!(result.success_count(), 0);
    }
}
