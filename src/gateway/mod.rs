//! # Gateway
//!
//! The request layer in front of the three actors. Every request except `health` is
//! routed through an [`InstanceLease`] on the service role that would serve it, so
//! traffic shows up in instance load and counters, and a faulted role fails the request
//! with [`GatewayError::Unavailable`].
//!
//! ## Placing an order
//!
//! ```text
//! lease order instance
//!   -> look up product          (NotFound)
//!   -> reserve stock            (InsufficientStock, Conflict)
//!   -> queue in the pipeline
//!   -> charge payment           (a decline is an outcome)
//!   -> schedule settlement after the priority's latency
//!   -> receipt
//! ```
//!
//! Settlement then commits or releases the reservation and overrides the order's
//! status; see [`settlement`].

pub mod admin;
pub mod error;
pub mod lease;
pub mod payment;
pub mod settlement;

pub use admin::{AdminAction, AdminOutcome};
pub use error::GatewayError;
pub use lease::InstanceLease;
pub use payment::{PaymentOutcome, PaymentService};
pub use settlement::{SettlementJob, SettlementQueue, SettlementWorker};

use crate::clients::{LedgerClient, PipelineClient, RegistryClient};
use crate::config::SimulationConfig;
use crate::ledger_actor::LedgerError;
use crate::model::{
    HealthSnapshot, InstanceId, InventorySnapshot, Order, OrderCreate, OrdersSnapshot, Priority,
    Product, ProductId, ServiceRole,
};
use actor_framework::ActorClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// A customer's order request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub user_id: String,
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order: Order,
    pub payment: PaymentOutcome,
    pub service_id: InstanceId,
}

/// A read view tagged with the instance that served it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Served<T> {
    #[serde(flatten)]
    pub data: T,
    pub service_id: InstanceId,
}

#[derive(Clone)]
pub struct Gateway {
    registry: RegistryClient,
    ledger: LedgerClient,
    pipeline: PipelineClient,
    payments: PaymentService,
    settlements: SettlementQueue,
    expedited_latency: Duration,
    standard_latency: Duration,
    release_after: Duration,
}

impl Gateway {
    pub fn new(
        registry: RegistryClient,
        ledger: LedgerClient,
        pipeline: PipelineClient,
        settlements: SettlementQueue,
        config: &SimulationConfig,
    ) -> Self {
        Self {
            payments: PaymentService::new(registry.clone(), config),
            registry,
            ledger,
            pipeline,
            settlements,
            expedited_latency: config.latency(Priority::Expedited),
            standard_latency: config.latency(Priority::Standard),
            release_after: config.lease_release_delay(),
        }
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    pub fn ledger(&self) -> &LedgerClient {
        &self.ledger
    }

    pub fn pipeline(&self) -> &PipelineClient {
        &self.pipeline
    }

    async fn lease(&self, role: ServiceRole) -> Result<InstanceLease, GatewayError> {
        InstanceLease::acquire(&self.registry, role, self.release_after).await
    }

    /// Runs `f` under a lease on `role`. Only a failure that is not a rejection of the
    /// request counts against the instance.
    async fn served<T, F, Fut>(&self, role: ServiceRole, f: F) -> Result<Served<T>, GatewayError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, GatewayError>>,
    {
        let lease = self.lease(role).await?;
        let service_id = lease.instance_id();
        match f().await {
            Ok(data) => {
                lease.release().await;
                Ok(Served { data, service_id })
            }
            Err(e) if e.is_rejection() => {
                lease.release().await;
                Err(e)
            }
            Err(e) => {
                lease.fail().await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self, request), fields(user = %request.user_id, product = %request.product_id))]
    pub async fn place_order(&self, request: PlaceOrder) -> Result<OrderReceipt, GatewayError> {
        let served = self
            .served(ServiceRole::Order, || self.accept_order(request))
            .await?;
        let (order, payment) = served.data;
        Ok(OrderReceipt {
            order,
            payment,
            service_id: served.service_id,
        })
    }

    async fn accept_order(
        &self,
        request: PlaceOrder,
    ) -> Result<(Order, PaymentOutcome), GatewayError> {
        let PlaceOrder {
            user_id,
            product_id,
            quantity,
            priority,
        } = request;

        let product = self
            .ledger
            .get(product_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(product_id.to_string()))?;
        self.ledger.reserve(product_id, quantity).await?;

        let order = match self
            .pipeline
            .submit(OrderCreate {
                user_id,
                product_id,
                product_name: product.name.clone(),
                quantity,
                priority,
            })
            .await
        {
            Ok(order) => order,
            Err(e) => {
                if let Err(release) = self.ledger.release(product_id, quantity).await {
                    warn!(%product_id, error = %release, "Failed to release reservation");
                }
                return Err(e.into());
            }
        };

        let payment = self
            .payments
            .charge(order.id, product.price * f64::from(quantity))
            .await;

        self.settlements
            .schedule(
                self.latency(priority),
                SettlementJob {
                    order_id: order.id,
                    product_id,
                    quantity,
                    payment: payment.clone(),
                },
            )
            .await?;

        info!(order_id = %order.id, paid = payment.success, "Order placed");
        Ok((order, payment))
    }

    fn latency(&self, priority: Priority) -> Duration {
        match priority {
            Priority::Expedited => self.expedited_latency,
            Priority::Standard => self.standard_latency,
        }
    }

    pub async fn orders(&self) -> Result<Served<OrdersSnapshot>, GatewayError> {
        self.served(ServiceRole::Order, || async {
            Ok::<_, GatewayError>(self.pipeline.snapshot().await?)
        })
        .await
    }

    pub async fn inventory(&self) -> Result<Served<InventorySnapshot>, GatewayError> {
        self.served(ServiceRole::Inventory, || async {
            Ok::<_, GatewayError>(self.ledger.snapshot().await?)
        })
        .await
    }

    /// Registry snapshot. Not leased, so it stays readable with every role down.
    pub async fn health(&self) -> Result<HealthSnapshot, GatewayError> {
        Ok(self.registry.health().await?)
    }

    #[instrument(skip(self))]
    pub async fn replenish(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Served<Product>, GatewayError> {
        self.served(ServiceRole::Inventory, || async {
            Ok::<_, GatewayError>(self.ledger.replenish(product_id, quantity).await?)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn admin(&self, action: AdminAction) -> AdminOutcome {
        let result = match action {
            AdminAction::SetLoadBalancing { strategy } => self
                .registry
                .set_strategy(strategy)
                .await
                .map_err(GatewayError::from),
            AdminAction::InjectFault {
                service_id,
                enabled,
            } => self
                .registry
                .inject_fault(service_id, enabled)
                .await
                .map(|_| ())
                .map_err(GatewayError::from),
            AdminAction::SetConsistency { mode } => self
                .ledger
                .set_mode(mode)
                .await
                .map_err(GatewayError::from),
        };
        match result {
            Ok(()) => AdminOutcome::ok(),
            Err(e) => {
                warn!(error = %e, "Admin action failed");
                AdminOutcome::failed(e.to_string())
            }
        }
    }

    /// Parses an [`AdminAction`] from its JSON form and applies it.
    pub async fn admin_json(&self, body: &str) -> AdminOutcome {
        match serde_json::from_str::<AdminAction>(body) {
            Ok(action) => self.admin(action).await,
            Err(e) => {
                warn!(error = %e, "Rejected admin request");
                AdminOutcome::failed("Invalid action")
            }
        }
    }
}
