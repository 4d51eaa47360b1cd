//! # Settlement
//!
//! After an order is placed and charged, its reservation is settled once the order's
//! fulfillment latency has passed. Jobs are sent to a single worker task that holds
//! them in a [`DeferredQueue`] until due, so no timer task is spawned per order.
//!
//! | Payment  | Ledger                | Order                          |
//! |----------|-----------------------|--------------------------------|
//! | approved | commit reservation    | `completed`                    |
//! | approved | commit fails, release | `failed` with the ledger error |
//! | declined | release reservation   | `failed` with the decline      |

use super::{GatewayError, PaymentOutcome};
use crate::clients::{LedgerClient, PipelineClient};
use crate::model::{OrderId, OrderStatus, ProductId};
use actor_framework::schedule::{sleep_until_due, DeferredQueue};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SettlementJob {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub payment: PaymentOutcome,
}

/// Sending half, held by the gateway.
#[derive(Clone)]
pub struct SettlementQueue {
    sender: mpsc::Sender<(Duration, SettlementJob)>,
}

impl SettlementQueue {
    pub async fn schedule(&self, after: Duration, job: SettlementJob) -> Result<(), GatewayError> {
        self.sender
            .send((after, job))
            .await
            .map_err(|_| GatewayError::SettlementClosed)
    }
}

pub struct SettlementWorker {
    receiver: mpsc::Receiver<(Duration, SettlementJob)>,
    pending: DeferredQueue<SettlementJob>,
    ledger: LedgerClient,
    pipeline: PipelineClient,
}

/// Creates a settlement queue and the worker that drains it.
pub fn channel(
    buffer: usize,
    ledger: LedgerClient,
    pipeline: PipelineClient,
) -> (SettlementQueue, SettlementWorker) {
    let (sender, receiver) = mpsc::channel(buffer);
    (
        SettlementQueue { sender },
        SettlementWorker {
            receiver,
            pending: DeferredQueue::new(),
            ledger,
            pipeline,
        },
    )
}

impl SettlementWorker {
    /// Runs until every [`SettlementQueue`] is dropped and nothing is left pending.
    pub async fn run(mut self) {
        info!("Settlement worker started");
        let mut open = true;
        while open || !self.pending.is_empty() {
            let due = self.pending.next_due();
            tokio::select! {
                msg = self.receiver.recv(), if open => match msg {
                    Some((after, job)) => {
                        debug!(order_id = %job.order_id, ?after, "Settlement scheduled");
                        self.pending.schedule(after, job);
                    }
                    None => open = false,
                },
                _ = sleep_until_due(due) => {
                    while let Some(job) = self.pending.pop_due(Instant::now()) {
                        self.settle(job).await;
                    }
                }
            }
        }
        info!("Settlement worker stopped");
    }

    async fn settle(&self, job: SettlementJob) {
        let SettlementJob {
            order_id,
            product_id,
            quantity,
            payment,
        } = job;

        if !payment.success {
            let reason = payment.error.unwrap_or_default();
            self.fail(order_id, product_id, quantity, reason).await;
            return;
        }

        match self.ledger.commit(product_id, quantity).await {
            Ok(product) => {
                info!(%order_id, %product_id, stock = product.stock, "Order settled");
                if let Err(e) = self
                    .pipeline
                    .update_status(order_id, OrderStatus::Completed, None)
                    .await
                {
                    warn!(%order_id, error = %e, "Failed to complete order");
                }
            }
            Err(e) => {
                self.fail(order_id, product_id, quantity, e.to_string())
                    .await
            }
        }
    }

    async fn fail(&self, order_id: OrderId, product_id: ProductId, quantity: u32, reason: String) {
        warn!(%order_id, %reason, "Settlement failed");
        if let Err(e) = self.ledger.release(product_id, quantity).await {
            warn!(%order_id, error = %e, "Failed to release reservation");
        }
        if let Err(e) = self
            .pipeline
            .update_status(order_id, OrderStatus::Failed, Some(reason))
            .await
        {
            warn!(%order_id, error = %e, "Failed to fail order");
        }
    }
}
