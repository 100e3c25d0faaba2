//! Fleet manifest loading, and a full run of the fixture fleet.

use std::path::Path;
use std::time::Duration;

use fleet_rs::engine::{Deadline, FleetProcessor};
use fleet_rs::error::Error;
use fleet_rs::manifest::{FleetManifest, TruckKind};
use fleet_rs::model::Phase;

#[test]
fn fixture_manifest_loads() {
    let manifest = FleetManifest::load(Path::new("fixtures/fleet.toml")).expect("load manifest");

    assert_eq!(manifest.trucks.len(), 4);
    assert_eq!(manifest.trucks[2].id, "NT3");
    assert_eq!(manifest.trucks[2].cargo, 40);
    assert_eq!(manifest.trucks[2].handling_ms, 1500);
    assert_eq!(manifest.trucks[3].kind, TruckKind::Electric);
    assert_eq!(manifest.trucks[3].battery, 8.0);
}

#[test]
fn missing_manifest_is_a_manifest_error() {
    let err = FleetManifest::load(Path::new("fixtures/does-not-exist.toml")).unwrap_err();
    assert!(matches!(err, Error::Manifest(_)));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = FleetManifest::from_toml_str(
        r#"
        [[truck]]
        id = "NT1"
        kind = "normal"

        [[truck]]
        id = "NT1"
        kind = "electric"
        "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate truck id NT1"));
}

#[test]
fn unknown_kind_is_rejected() {
    let err = FleetManifest::from_toml_str(
        r#"
        [[truck]]
        id = "X1"
        kind = "hover"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Manifest(_)));
}

fn electric_entry(fields: &str) -> String {
    format!("[[truck]]\nid = \"ET1\"\nkind = \"electric\"\n{fields}\n")
}

#[test]
fn negative_or_non_finite_battery_values_are_rejected() {
    for (fields, field) in [
        ("load_cost = -50.0", "load_cost"),
        ("unload_cost = -5.0", "unload_cost"),
        ("load_cost = inf", "load_cost"),
        ("unload_cost = nan", "unload_cost"),
        ("battery = -1.0", "battery"),
        ("battery = nan", "battery"),
        ("battery = inf", "battery"),
    ] {
        let err = FleetManifest::from_toml_str(&electric_entry(fields)).unwrap_err();
        match err {
            Error::Manifest(msg) => assert!(msg.contains(field), "{fields}: {msg}"),
            other => panic!("expected Manifest error for {fields}, got {other:?}"),
        }
    }
}

#[test]
fn zero_costs_and_empty_battery_are_accepted() {
    let manifest =
        FleetManifest::from_toml_str(&electric_entry("battery = 0.0\nload_cost = 0.0\nunload_cost = 0.0"))
            .unwrap();
    assert_eq!(manifest.trucks[0].battery, 0.0);
}

#[test]
fn empty_manifest_has_no_trucks() {
    let manifest = FleetManifest::from_toml_str("").unwrap();
    assert!(manifest.trucks.is_empty());
}

#[tokio::test(start_paused = true)]
async fn fixture_fleet_reports_each_failure_phase() {
    let manifest = FleetManifest::load(Path::new("fixtures/fleet.toml")).unwrap();
    let processor = FleetProcessor::new(Deadline::per_truck(Duration::from_millis(500)));

    let run = processor.process(manifest.into_trucks()).await.unwrap();

    assert_eq!(run.result.total, 4);
    assert_eq!(run.result.failure_count, 2);
    let timed_out: Vec<_> = run.result.failures_in(Phase::Timeout).collect();
    let refused: Vec<_> = run.result.failures_in(Phase::Load).collect();
    assert_eq!(timed_out.len(), 1);
    assert_eq!(timed_out[0].truck_id, "NT3");
    assert_eq!(refused.len(), 1);
    assert_eq!(refused[0].truck_id, "ET3");
    assert!(refused[0].message.contains("battery depleted"));
}
