//! Integration tests for telemetry initialization and span helpers.

use fleet_rs::model::RunId;
use fleet_rs::telemetry::fleet::{record_failures, record_phase, start_fleet_span, start_truck_span};
use fleet_rs::telemetry::{TelemetryConfig, init_telemetry};

#[test]
fn telemetry_initializes_without_endpoint() {
    // A global subscriber can only be set once per process, so a second
    // init in the same binary is allowed to fail.
    let _guard = init_telemetry(TelemetryConfig::new("fleet-test"));
}

#[test]
fn fleet_span_records_failures() {
    let span = start_fleet_span(&RunId::new(), 4);
    record_failures(&span, 1);
}

#[test]
fn truck_span_records_phase() {
    let span = start_truck_span("NT1");
    record_phase(&span, "load");
}
