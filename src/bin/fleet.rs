//! fleet CLI: process a fleet of trucks concurrently.
//!
//! Exits non-zero when every truck in a non-empty fleet failed; partial
//! failures are printed in the summary and exit zero.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use fleet_rs::config::Config;
use fleet_rs::engine::{FleetProcessor, FleetRun};
use fleet_rs::error::Error;
use fleet_rs::manifest::FleetManifest;
use fleet_rs::model::{FleetResult, Truck};
use fleet_rs::registry::TruckManager;
use fleet_rs::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "fleet", about = "Concurrent truck fleet processing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and unload every truck concurrently and print a summary
    Process {
        /// Fleet manifest (TOML). Defaults to the built-in demo fleet
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Deadline for each truck, in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        truck_timeout_ms: Option<u64>,
        /// Deadline for the whole fleet, in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        batch_timeout_ms: Option<u64>,
        /// Print the fleet result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a manifest's trucks and list them
    Trucks {
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "fleet".to_string(),
        log_level: config.log_level.clone(),
    })?;

    match cli.command {
        Command::Process {
            manifest,
            truck_timeout_ms,
            batch_timeout_ms,
            json,
        } => {
            let mut deadline = config.deadline();
            if let Some(ms) = truck_timeout_ms {
                deadline = deadline.with_per_truck(Duration::from_millis(ms));
            }
            if let Some(ms) = batch_timeout_ms {
                deadline = deadline.with_batch(Duration::from_millis(ms));
            }
            let manifest = load_manifest(manifest.or(config.manifest))?;
            let processor = FleetProcessor::new(deadline);

            match processor.process(manifest.into_trucks()).await {
                Ok(run) => {
                    print_run(&run, json)?;
                    Ok(())
                }
                Err(Error::AllItemsFailed { run }) => {
                    print_run(&run, json)?;
                    tracing::error!(run_id = %run.result.run_id, "every truck failed");
                    guard.force_flush();
                    Err(Error::AllItemsFailed { run }.into())
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Trucks { manifest } => {
            let manifest = load_manifest(manifest.or(config.manifest))?;
            let manager = TruckManager::new();
            manifest.register(&manager)?;

            println!("{:<12} {:>8}", "ID", "CARGO");
            for truck in manager.list_trucks()? {
                println!("{:<12} {:>8}", truck.id, truck.cargo);
            }
            println!("\n{} truck(s)", manager.len()?);
            Ok(())
        }
    }
}

fn load_manifest(path: Option<PathBuf>) -> anyhow::Result<FleetManifest> {
    Ok(match path {
        Some(path) => FleetManifest::load(&path)?,
        None => FleetManifest::demo(),
    })
}

fn print_run(run: &FleetRun, json: bool) -> anyhow::Result<()> {
    print_result(&run.result, json)?;
    if json {
        return Ok(());
    }

    println!();
    for truck in &run.trucks {
        print_truck(truck.as_ref());
    }
    if run.result.failure_count == 0 {
        println!("\nAll trucks processed successfully");
    }
    Ok(())
}

fn print_result(result: &FleetResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Run:        {}", result.run_id);
    println!("Started:    {}", result.started_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Trucks:     {}", result.total);
    println!("Succeeded:  {}", result.success_count());
    println!("Failed:     {}", result.failure_count);
    for failure in &result.failures {
        println!(
            "  {:<10} {:<10} {}",
            failure.truck_id,
            failure.phase.to_string(),
            failure.message
        );
    }
    Ok(())
}

fn print_truck(truck: &dyn Truck) {
    match truck.battery_level() {
        Some(battery) => println!(
            "{:<10} cargo={:<5} battery={battery:.1}",
            truck.id(),
            truck.cargo()
        ),
        None => println!("{:<10} cargo={}", truck.id(), truck.cargo()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_millisecond_deadlines_are_rejected() {
        for flag in ["--truck-timeout-ms", "--batch-timeout-ms"] {
            assert!(Cli::try_parse_from(["fleet", "process", flag, "0"]).is_err());
            assert!(Cli::try_parse_from(["fleet", "process", flag, "250"]).is_ok());
        }
    }
}
