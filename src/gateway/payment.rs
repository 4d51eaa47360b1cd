//! The simulated payment service.

use super::InstanceLease;
use crate::clients::RegistryClient;
use crate::config::SimulationConfig;
use crate::model::{InstanceId, OrderId, ServiceRole};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

pub const DECLINED: &str = "Payment declined";
pub const UNAVAILABLE: &str = "Payment service unavailable";

/// Result of a charge. A decline is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub success: bool,
    pub order_id: OrderId,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The payment instance that handled the charge, if one was reachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<InstanceId>,
}

impl PaymentOutcome {
    fn approved(order_id: OrderId, amount: f64, service_id: InstanceId) -> Self {
        Self {
            success: true,
            order_id,
            amount,
            transaction_id: Some(format!("txn-{}", Utc::now().timestamp_millis())),
            error: None,
            service_id: Some(service_id),
        }
    }

    fn declined(
        order_id: OrderId,
        amount: f64,
        reason: &str,
        service_id: Option<InstanceId>,
    ) -> Self {
        Self {
            success: false,
            order_id,
            amount,
            transaction_id: None,
            error: Some(reason.to_string()),
            service_id,
        }
    }
}

/// Charges orders through a leased payment instance.
#[derive(Clone)]
pub struct PaymentService {
    registry: RegistryClient,
    latency: Duration,
    decline_probability: f64,
    release_after: Duration,
}

impl PaymentService {
    pub fn new(registry: RegistryClient, config: &SimulationConfig) -> Self {
        Self {
            registry,
            latency: config.payment_latency(),
            decline_probability: config.payment_decline_probability,
            release_after: config.lease_release_delay(),
        }
    }

    /// Waits the payment latency, then approves or declines at random. An unreachable
    /// payment role declines with [`UNAVAILABLE`].
    pub async fn charge(&self, order_id: OrderId, amount: f64) -> PaymentOutcome {
        let lease =
            match InstanceLease::acquire(&self.registry, ServiceRole::Payment, self.release_after)
                .await
            {
                Ok(lease) => lease,
                Err(e) => {
                    warn!(%order_id, error = %e, "Payment service unreachable");
                    return PaymentOutcome::declined(order_id, amount, UNAVAILABLE, None);
                }
            };
        let service_id = lease.instance_id();

        tokio::time::sleep(self.latency).await;

        if rand::thread_rng().gen::<f64>() < self.decline_probability {
            lease.fail().await;
            info!(%order_id, %service_id, "Payment declined");
            PaymentOutcome::declined(order_id, amount, DECLINED, Some(service_id))
        } else {
            lease.release().await;
            info!(%order_id, %service_id, amount, "Payment approved");
            PaymentOutcome::approved(order_id, amount, service_id)
        }
    }
}
