//! Priority queues and the single in-flight slot.

use super::{PipelineCommand, PipelineError, PipelineReply};
use crate::model::{
    Fulfillment, Order, OrderCreate, OrderId, OrderStatus, OrdersSnapshot, Priority, QueueStatus,
};
use actor_framework::{ActorEntity, Store, StorePolicy};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info};

/// Pipeline-wide state: two FIFO lanes and the order the drain loop holds, if any.
///
/// Lanes hold ids only; the orders live in the store. Expedited always drains first,
/// so a steady expedited stream starves the standard lane.
#[derive(Debug, Default)]
pub struct PipelinePolicy {
    expedited: VecDeque<OrderId>,
    standard: VecDeque<OrderId>,
    in_flight: Option<OrderId>,
    wake: Arc<Notify>,
}

impl PipelinePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signalled on every submission. The drain loop waits on it while idle.
    pub fn wake_signal(&self) -> Arc<Notify> {
        self.wake.clone()
    }

    fn lane(&mut self, priority: Priority) -> &mut VecDeque<OrderId> {
        match priority {
            Priority::Expedited => &mut self.expedited,
            Priority::Standard => &mut self.standard,
        }
    }

    fn submit(&mut self, store: &mut Store<Order>, params: OrderCreate) -> Order {
        let id = Order::assign_id(store.next_seq(), &params);
        let order = Order::new(id, params);
        self.lane(order.priority).push_back(id);
        store.insert(id, order.clone());
        info!(%id, priority = ?order.priority, size = store.len(), "Order queued");
        self.wake.notify_one();
        order
    }

    fn next_order(&mut self, store: &mut Store<Order>) -> Result<Option<Order>, PipelineError> {
        if let Some(id) = self.in_flight {
            return Err(PipelineError::Busy(id));
        }
        while let Some(id) = self.expedited.pop_front().or_else(|| self.standard.pop_front()) {
            let Some(order) = store.get_mut(&id) else {
                continue;
            };
            if order.status != OrderStatus::Pending {
                debug!(%id, status = %order.status, "Skipping order settled while queued");
                continue;
            }
            order.start_processing();
            self.in_flight = Some(id);
            return Ok(Some(order.clone()));
        }
        Ok(None)
    }

    fn finish(
        &mut self,
        store: &mut Store<Order>,
        id: OrderId,
        outcome: Fulfillment,
    ) -> Result<Order, PipelineError> {
        if self.in_flight != Some(id) {
            return Err(PipelineError::NotInFlight(id));
        }
        self.in_flight = None;
        let order = store
            .get_mut(&id)
            .ok_or_else(|| PipelineError::NotFound(id.to_string()))?;
        // An external override while processing wins over the drain loop's roll.
        if order.status == OrderStatus::Processing {
            match outcome {
                Fulfillment::Completed => order.set_status(OrderStatus::Completed, None),
                Fulfillment::Failed(reason) => {
                    order.set_status(OrderStatus::Failed, Some(reason))
                }
            }
        }
        info!(%id, status = %order.status, "Order finished");
        Ok(order.clone())
    }

    fn queue_status(&self, store: &Store<Order>) -> QueueStatus {
        QueueStatus {
            expedited_queue: self.expedited.len(),
            standard_queue: self.standard.len(),
            processing: self.in_flight.is_some(),
            processing_order: self.in_flight.and_then(|id| store.get(&id).cloned()),
        }
    }
}

impl StorePolicy<Order> for PipelinePolicy {
    type Command = PipelineCommand;
    type Reply = PipelineReply;

    fn handle_command(
        &mut self,
        command: PipelineCommand,
        store: &mut Store<Order>,
        _ctx: &(),
    ) -> Result<PipelineReply, PipelineError> {
        match command {
            PipelineCommand::Submit(params) => {
                Ok(PipelineReply::Submitted(self.submit(store, params)))
            }
            PipelineCommand::NextOrder => Ok(PipelineReply::Next(self.next_order(store)?)),
            PipelineCommand::Finish { id, outcome } => {
                Ok(PipelineReply::Finished(self.finish(store, id, outcome)?))
            }
            PipelineCommand::QueueStatus => {
                Ok(PipelineReply::QueueStatus(self.queue_status(store)))
            }
            PipelineCommand::Orders => {
                let mut orders: Vec<Order> = store.iter().cloned().collect();
                orders.reverse();
                Ok(PipelineReply::Orders(OrdersSnapshot {
                    orders,
                    queue_status: self.queue_status(store),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;

    fn params(priority: Priority) -> OrderCreate {
        OrderCreate {
            user_id: "user-1".into(),
            product_id: ProductId(1),
            product_name: "Laptop Pro".into(),
            quantity: 1,
            priority,
        }
    }

    fn next(policy: &mut PipelinePolicy, store: &mut Store<Order>) -> Option<Order> {
        policy.next_order(store).unwrap()
    }

    #[test]
    fn expedited_lane_drains_first() {
        let mut store = Store::new();
        let mut policy = PipelinePolicy::new();
        let standard = policy.submit(&mut store, params(Priority::Standard));
        let expedited = policy.submit(&mut store, params(Priority::Expedited));

        let first = next(&mut policy, &mut store).unwrap();
        assert_eq!(first.id, expedited.id);
        assert_eq!(first.status, OrderStatus::Processing);
        assert!(first.processed_at.is_some());

        policy
            .finish(&mut store, first.id, Fulfillment::Completed)
            .unwrap();
        assert_eq!(next(&mut policy, &mut store).unwrap().id, standard.id);
    }

    #[test]
    fn only_one_order_in_flight() {
        let mut store = Store::new();
        let mut policy = PipelinePolicy::new();
        policy.submit(&mut store, params(Priority::Standard));
        policy.submit(&mut store, params(Priority::Standard));

        let first = next(&mut policy, &mut store).unwrap();
        assert_eq!(
            policy.next_order(&mut store).unwrap_err(),
            PipelineError::Busy(first.id)
        );
        let status = policy.queue_status(&store);
        assert!(status.processing);
        assert_eq!(status.standard_queue, 1);
        assert_eq!(status.processing_order.map(|o| o.id), Some(first.id));
    }

    #[test]
    fn failure_records_reason_and_completion_time() {
        let mut store = Store::new();
        let mut policy = PipelinePolicy::new();
        policy.submit(&mut store, params(Priority::Expedited));
        let order = next(&mut policy, &mut store).unwrap();

        let done = policy
            .finish(
                &mut store,
                order.id,
                Fulfillment::Failed("Payment processing failed".into()),
            )
            .unwrap();
        assert_eq!(done.status, OrderStatus::Failed);
        assert_eq!(done.error.as_deref(), Some("Payment processing failed"));
        assert!(done.completed_at.is_some());
        assert!(!policy.queue_status(&store).processing);
    }

    #[test]
    fn queued_orders_settled_externally_are_skipped() {
        let mut store = Store::new();
        let mut policy = PipelinePolicy::new();
        let settled = policy.submit(&mut store, params(Priority::Expedited));
        let pending = policy.submit(&mut store, params(Priority::Standard));
        store
            .get_mut(&settled.id)
            .unwrap()
            .set_status(OrderStatus::Completed, None);

        assert_eq!(next(&mut policy, &mut store).unwrap().id, pending.id);
    }

    #[test]
    fn finish_does_not_overwrite_external_override() {
        let mut store = Store::new();
        let mut policy = PipelinePolicy::new();
        policy.submit(&mut store, params(Priority::Standard));
        let order = next(&mut policy, &mut store).unwrap();
        store
            .get_mut(&order.id)
            .unwrap()
            .set_status(OrderStatus::Failed, Some("Payment declined".into()));

        let done = policy
            .finish(&mut store, order.id, Fulfillment::Completed)
            .unwrap();
        assert_eq!(done.status, OrderStatus::Failed);
        assert_eq!(done.error.as_deref(), Some("Payment declined"));
    }

    #[test]
    fn finishing_an_order_not_in_flight_is_rejected() {
        let mut store = Store::new();
        let mut policy = PipelinePolicy::new();
        let order = policy.submit(&mut store, params(Priority::Standard));
        assert_eq!(
            policy
                .finish(&mut store, order.id, Fulfillment::Completed)
                .unwrap_err(),
            PipelineError::NotInFlight(order.id)
        );
    }

    #[test]
    fn orders_list_newest_first() {
        let mut store = Store::new();
        let mut policy = PipelinePolicy::new();
        let first = policy.submit(&mut store, params(Priority::Standard));
        let second = policy.submit(&mut store, params(Priority::Expedited));

        let Ok(PipelineReply::Orders(snapshot)) =
            policy.handle_command(PipelineCommand::Orders, &mut store, &())
        else {
            panic!("Expected Orders reply");
        };
        let ids: Vec<OrderId> = snapshot.orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(snapshot.queue_status.expedited_queue, 1);
        assert_eq!(snapshot.queue_status.standard_queue, 1);
    }
}
