//! Customer orders moving through the fulfillment pipeline.
//!
//! [`Order`] implements [`ActorEntity`](actor_framework::ActorEntity). Creation
//! parameters are [`OrderCreate`]; the update type [`OrderStatusUpdate`] is the
//! external status override.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::{ParseIdError, ProductId};

/// Type-safe identifier for Orders, rendered as `order-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order-{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("order-")
            .and_then(|n| n.parse().ok())
            .map(Self)
            .ok_or_else(|| ParseIdError::Malformed(s.to_string()))
    }
}

impl TryFrom<String> for OrderId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        id.to_string()
    }
}

/// Fulfillment lane. Expedited always drains first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "vip")]
    Expedited,
    #[default]
    #[serde(alias = "normal")]
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub priority: Priority,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Order {
    /// A pending order stamped with the current time.
    pub fn new(id: OrderId, params: OrderCreate) -> Self {
        Self {
            id,
            user_id: params.user_id,
            product_id: params.product_id,
            product_name: params.product_name,
            quantity: params.quantity,
            priority: params.priority,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            processed_at: None,
            completed_at: None,
            error: None,
        }
    }

    pub fn start_processing(&mut self) {
        self.status = OrderStatus::Processing;
        self.processed_at = Some(Utc::now());
    }

    /// Moves to `status`; terminal states stamp `completed_at`.
    pub fn set_status(&mut self, status: OrderStatus, error: Option<String>) {
        self.status = status;
        if error.is_some() {
            self.error = error;
        }
        if status.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub user_id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub priority: Priority,
}

/// External status override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    pub error: Option<String>,
}

/// Outcome of one pipeline step, decided by the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Fulfillment {
    Completed,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub expedited_queue: usize,
    pub standard_queue: usize,
    /// Whether the drain loop holds an order.
    pub processing: bool,
    pub processing_order: Option<Order>,
}

/// Order list (newest first) plus the queue status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersSnapshot {
    pub orders: Vec<Order>,
    pub queue_status: QueueStatus,
}
