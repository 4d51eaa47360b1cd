//! The drain loop.
//!
//! A single task pulls orders through the pipeline actor one at a time, so the actor
//! stays responsive while an order "processes". The actor enforces the single
//! in-flight slot; this loop only supplies latency and the outcome roll.

use crate::clients::PipelineClient;
use crate::config::SimulationConfig;
use crate::model::{Fulfillment, Order, Priority};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tracing::{info, warn};

pub const FAILURE_REASON: &str = "Payment processing failed";

/// Simulated fulfillment of a dequeued order.
pub struct PipelineWorker {
    client: PipelineClient,
    wake: Arc<Notify>,
    expedited_latency: Duration,
    standard_latency: Duration,
    failure_probability: f64,
}

impl PipelineWorker {
    pub fn new(client: PipelineClient, wake: Arc<Notify>, config: &SimulationConfig) -> Self {
        Self {
            client,
            wake,
            expedited_latency: config.latency(Priority::Expedited),
            standard_latency: config.latency(Priority::Standard),
            failure_probability: config.pipeline_failure_probability,
        }
    }

    fn latency(&self, priority: Priority) -> Duration {
        match priority {
            Priority::Expedited => self.expedited_latency,
            Priority::Standard => self.standard_latency,
        }
    }

    fn roll(&self) -> Fulfillment {
        if rand::thread_rng().gen::<f64>() < self.failure_probability {
            Fulfillment::Failed(FAILURE_REASON.to_string())
        } else {
            Fulfillment::Completed
        }
    }

    async fn process(&self, order: Order) {
        tokio::time::sleep(self.latency(order.priority)).await;
        let outcome = self.roll();
        if let Err(e) = self.client.finish(order.id, outcome).await {
            warn!(id = %order.id, error = %e, "Failed to record outcome");
        }
    }

    /// Drains the lanes until `shutdown` flips to `true` (or its sender is dropped).
    ///
    /// An order being processed when shutdown arrives is abandoned in `processing`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("Drain loop started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            match self.client.next_order().await {
                Ok(Some(order)) => {
                    let id = order.id;
                    tokio::select! {
                        _ = self.process(order) => {}
                        _ = shutdown.changed() => {
                            warn!(%id, "Shutdown while processing");
                            break;
                        }
                    }
                }
                Ok(None) => {
                    tokio::select! {
                        _ = self.wake.notified() => {}
                        changed = shutdown.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Pipeline unreachable");
                    break;
                }
            }
        }
        info!("Drain loop stopped");
    }
}
