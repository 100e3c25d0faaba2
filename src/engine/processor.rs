//! Fleet processor: fans one task out per truck, waits for every task, then
//! aggregates.

use std::time::Duration;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use opentelemetry::KeyValue;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, warn};

use crate::error::{Error, Result};
use crate::model::{FleetResult, Outcome, RunId, TruckRef};
use crate::telemetry::fleet::{record_failures, start_fleet_span};
use crate::telemetry::metrics;

use super::aggregate::ResultAggregator;
use super::worker::run_truck;

/// Time bounds for a fleet run. Both may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    /// Bound on each truck, measured from when its task starts.
    pub per_truck: Option<Duration>,
    /// Bound on the whole fan-out, armed once before any task starts.
    pub batch: Option<Duration>,
}

impl Deadline {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn per_truck(d: Duration) -> Self {
        Self {
            per_truck: Some(d),
            batch: None,
        }
    }

    pub fn batch(d: Duration) -> Self {
        Self {
            per_truck: None,
            batch: Some(d),
        }
    }

    pub fn with_per_truck(mut self, d: Duration) -> Self {
        self.per_truck = Some(d);
        self
    }

    pub fn with_batch(mut self, d: Duration) -> Self {
        self.batch = Some(d);
        self
    }
}

/// A finished run: the summary plus the trucks, handed back in submission
/// order so their end state can be inspected.
#[derive(Debug)]
pub struct FleetRun {
    pub result: FleetResult,
    pub trucks: Vec<TruckRef>,
}

/// Processes a fleet concurrently, one task per truck.
///
/// Individual failures never stop other trucks and are never retried. The
/// call itself fails only with [`Error::AllItemsFailed`], when the fleet is
/// non-empty and no truck succeeded. That error still carries the full
/// [`FleetRun`], trucks included. Partial failure is reported through
/// [`FleetResult`] alone.
#[derive(Debug, Clone, Default)]
pub struct FleetProcessor {
    deadline: Deadline,
}

impl FleetProcessor {
    pub fn new(deadline: Deadline) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Process every truck and return once all of them are terminal.
    pub async fn process(&self, trucks: Vec<TruckRef>) -> Result<FleetRun> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let total = trucks.len();
        let fleet_span = start_fleet_span(&run_id, total);

        async {
            let cancel = CancellationToken::new();
            let timer = self
                .deadline
                .batch
                .map(|after| arm_batch_deadline(cancel.clone(), after));

            // Sized to the fleet: a worker never waits on the consumer.
            let (tx, mut rx) = mpsc::channel::<Outcome>(total.max(1));
            let mut tasks = FuturesUnordered::new();

            for (index, truck) in trucks.into_iter().enumerate() {
                let truck_id = truck.id().to_string();
                let tx = tx.clone();
                let cancel = cancel.clone();
                let per_truck = self.deadline.per_truck;

                let handle = tokio::spawn(
                    async move {
                        let mut truck = truck;
                        let outcome = run_truck(truck.as_mut(), per_truck, &cancel).await;
                        if tx.send(outcome).await.is_err() {
                            warn!("outcome channel closed before truck reported");
                        }
                        truck
                    }
                    .in_current_span(),
                );
                tasks.push(async move { (index, truck_id, handle.await) });
            }
            drop(tx);
            info!(trucks = total, "fleet dispatched");

            // Join barrier: nothing is aggregated until every task is done.
            let mut returned: Vec<Option<TruckRef>> = (0..total).map(|_| None).collect();
            let mut lost = Vec::new();
            while let Some((index, truck_id, joined)) = tasks.next().await {
                match joined {
                    Ok(truck) => returned[index] = Some(truck),
                    Err(e) => {
                        error!(truck_id = %truck_id, error = %e, "worker task failed");
                        lost.push(Outcome {
                            result: Err(Error::WorkerPanicked {
                                truck_id: truck_id.clone(),
                            }),
                            truck_id,
                            duration_ms: 0,
                        });
                    }
                }
            }

            if let Some(timer) = timer {
                timer.abort();
                let _ = timer.await;
            }

            let mut aggregator = ResultAggregator::new(run_id, started_at);
            while let Some(outcome) = rx.recv().await {
                record_metrics(&outcome);
                aggregator.record(outcome);
            }
            for outcome in lost {
                record_metrics(&outcome);
                aggregator.record(outcome);
            }
            let result = aggregator.finish();
            record_failures(&fleet_span, result.failure_count);

            let label = if result.all_failed() {
                "all_failed"
            } else if result.failure_count > 0 {
                "partial"
            } else {
                "ok"
            };
            metrics::fleet_runs().add(1, &[KeyValue::new("result", label)]);
            info!(
                total = result.total,
                failures = result.failure_count,
                result = label,
                "fleet processed"
            );

            let run = FleetRun {
                result,
                trucks: returned.into_iter().flatten().collect(),
            };
            if run.result.all_failed() {
                return Err(Error::AllItemsFailed { run: Box::new(run) });
            }
            Ok(run)
        }
        .instrument(fleet_span.clone())
        .await
    }
}

/// Cancel `cancel` once `after` has elapsed.
fn arm_batch_deadline(cancel: CancellationToken, after: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        warn!(?after, "batch deadline reached, cancelling remaining trucks");
        cancel.cancel();
    })
}

fn record_metrics(outcome: &Outcome) {
    let (result, phase) = match outcome.phase() {
        None => ("ok", "done".to_string()),
        Some(phase) => ("failed", phase.to_string()),
    };
    metrics::trucks_processed().add(
        1,
        &[KeyValue::new("result", result), KeyValue::new("phase", phase)],
    );
    metrics::truck_duration_ms().record(outcome.duration_ms as f64, &[]);
}
