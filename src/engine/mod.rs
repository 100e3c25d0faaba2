//! Processing engine: per-truck worker, fleet fan-out, outcome aggregation.

pub mod aggregate;
pub mod processor;
pub mod worker;

pub use aggregate::{ResultAggregator, aggregate};
pub use processor::{Deadline, FleetProcessor, FleetRun};
pub use worker::{process_truck, run_truck};
