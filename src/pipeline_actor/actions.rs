//! Store commands for the Pipeline actor.
//!
//! Queue membership and the in-flight slot belong to the pipeline as a whole, so every
//! pipeline operation is a command; orders themselves only take the status override
//! (the entity's update).

use crate::model::{Fulfillment, Order, OrderCreate, OrderId, OrdersSnapshot, QueueStatus};

#[derive(Debug, Clone)]
pub enum PipelineCommand {
    /// Index the order, append it to its lane and wake the drain loop.
    Submit(OrderCreate),
    /// Pop the next pending order (expedited first) and mark it processing.
    NextOrder,
    /// Report the drain loop's outcome for the in-flight order.
    Finish { id: OrderId, outcome: Fulfillment },
    QueueStatus,
    Orders,
}

#[derive(Debug, Clone)]
pub enum PipelineReply {
    Submitted(Order),
    Next(Option<Order>),
    Finished(Order),
    QueueStatus(QueueStatus),
    Orders(OrdersSnapshot),
}
