//! # fleet-rs
//!
//! Concurrent fleet processing. Every truck is loaded and unloaded in its own
//! task, bounded by an optional per-truck and/or batch deadline; the
//! processor waits for all tasks and folds their outcomes into one
//! [`FleetResult`](model::FleetResult).
//!
//! Also provides a reader/writer-locked truck registry, TOML fleet manifests
//! and tracing/OpenTelemetry setup.

pub mod config;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod model;
pub mod registry;
pub mod telemetry;
