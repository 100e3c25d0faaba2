//! Fleet and truck span helpers.
//!
//! Provides span creation and phase recording for trucks flowing through
//! the processor.

use tracing::Span;

use crate::model::RunId;

/// Start a span covering one fleet run.
///
/// `fleet.failures` is declared empty and filled via [`record_failures`]
/// once the run is aggregated.
pub fn start_fleet_span(run_id: &RunId, size: usize) -> Span {
    tracing::info_span!(
        "fleet.process",
        "fleet.run_id" = %run_id,
        "fleet.size" = size,
        "fleet.failures" = tracing::field::Empty,
    )
}

/// Start a span for a single truck's load/unload protocol.
pub fn start_truck_span(truck_id: &str) -> Span {
    tracing::info_span!(
        "truck.process",
        "truck.id" = truck_id,
        "truck.phase" = tracing::field::Empty,
    )
}

/// Record the phase a truck reached and emit an event scoped to its span.
pub fn record_phase(span: &Span, phase: &str) {
    span.record("truck.phase", phase);
    span.in_scope(|| {
        tracing::debug!(phase = phase, "phase_reached");
    });
}

pub fn record_failures(span: &Span, failures: usize) {
    span.record("fleet.failures", failures);
}
