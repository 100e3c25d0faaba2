//! Worker unit: the load → unload protocol for a single truck.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Outcome, Truck};
use crate::telemetry::fleet::{record_phase, start_truck_span};

/// Load then unload one truck.
///
/// A failed load returns immediately and unload is never attempted, so the
/// truck keeps its pre-load state.
pub async fn process_truck(truck: &mut dyn Truck) -> Result<()> {
    let truck_id = truck.id().to_string();

    debug!(truck_id = %truck_id, "loading cargo");
    truck
        .load_cargo()
        .await
        .map_err(|source| Error::LoadFailed {
            truck_id: truck_id.clone(),
            source,
        })?;

    debug!(truck_id = %truck_id, "unloading cargo");
    truck
        .unload_cargo()
        .await
        .map_err(|source| Error::UnloadFailed { truck_id, source })?;

    Ok(())
}

/// Run the protocol for one truck against its deadlines and turn whatever
/// happens into an [`Outcome`].
///
/// `per_truck` bounds this truck alone; `cancel` is the batch deadline shared
/// by the whole fleet. Whichever of protocol, timer and cancellation finishes
/// first decides the outcome. Both deadlines only take effect at the next
/// await point of the truck's own operations.
pub async fn run_truck(
    truck: &mut dyn Truck,
    per_truck: Option<Duration>,
    cancel: &CancellationToken,
) -> Outcome {
    let start = Instant::now();
    let truck_id = truck.id().to_string();
    let span = start_truck_span(&truck_id);

    let result = async {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled {
                truck_id: truck_id.clone(),
            }),
            result = bounded(truck, &truck_id, per_truck) => result,
        }
    }
    .instrument(span.clone())
    .await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let outcome = Outcome {
        truck_id,
        result,
        duration_ms,
    };

    match outcome.phase() {
        None => {
            record_phase(&span, "done");
            info!(truck_id = %outcome.truck_id, duration_ms, "truck processed");
        }
        Some(phase) => {
            record_phase(&span, &phase.to_string());
            if let Err(ref e) = outcome.result {
                warn!(
                    truck_id = %outcome.truck_id,
                    %phase,
                    duration_ms,
                    error = %e,
                    "truck failed"
                );
            }
        }
    }

    outcome
}

async fn bounded(truck: &mut dyn Truck, truck_id: &str, per_truck: Option<Duration>) -> Result<()> {
    let Some(after) = per_truck else {
        return process_truck(truck).await;
    };

    // Dropping the protocol future on expiry means a later load/unload error
    // can never be reported for this truck.
    match tokio::time::timeout(after, process_truck(truck)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            truck_id: truck_id.to_string(),
            after,
        }),
    }
}
