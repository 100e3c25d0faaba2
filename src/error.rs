//! Error types for fleet-rs.

use std::time::Duration;

use thiserror::Error;

use crate::engine::FleetRun;

/// Why a truck refused a load or unload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CargoError {
    #[error("battery depleted: need {required:.1}, have {available:.1}")]
    BatteryDepleted { required: f64, available: f64 },

    #[error("{0}")]
    Fault(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("error loading cargo for truck {truck_id}: {source}")]
    LoadFailed {
        truck_id: String,
        #[source]
        source: CargoError,
    },

    #[error("error unloading cargo for truck {truck_id}: {source}")]
    UnloadFailed {
        truck_id: String,
        #[source]
        source: CargoError,
    },

    #[error("truck {truck_id} timed out after {after:?}")]
    Timeout { truck_id: String, after: Duration },

    #[error("truck {truck_id} cancelled by batch deadline")]
    Cancelled { truck_id: String },

    #[error("worker for truck {truck_id} panicked")]
    WorkerPanicked { truck_id: String },

    #[error("truck not found: {0}")]
    NotFound(String),

    #[error("truck with id {0} already exists")]
    AlreadyExists(String),

    #[error("registry lock poisoned")]
    LockPoisoned,

    /// Every truck in a non-empty fleet failed. Carries the whole run so the
    /// trucks can still be inspected.
    #[error("all {} trucks failed", run.result.total)]
    AllItemsFailed { run: Box<FleetRun> },

    #[error("config error: {0}")]
    Config(String),

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
