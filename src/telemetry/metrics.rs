//! Metric instrument factories for fleet-rs.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"fleet-rs"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for fleet-rs instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("fleet-rs")
}

/// Counter: trucks that reached a terminal state.
/// Labels: `result` ("ok" | "failed"), `phase` (failing phase, or "done").
pub fn trucks_processed() -> Counter<u64> {
    meter()
        .u64_counter("fleet.trucks.processed")
        .with_description("Number of trucks processed")
        .build()
}

/// Counter: completed fleet runs.
/// Labels: `result` ("ok" | "partial" | "all_failed").
pub fn fleet_runs() -> Counter<u64> {
    meter()
        .u64_counter("fleet.runs")
        .with_description("Number of fleet runs")
        .build()
}

/// Histogram: per-truck processing time in milliseconds.
pub fn truck_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("fleet.truck.duration_ms")
        .with_description("Truck processing duration in milliseconds")
        .with_unit("ms")
        .build()
}
