//! ActorEntity implementation for the Order domain type.

use super::PipelineError;
use crate::model::{Order, OrderCreate, OrderId, OrderStatusUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderStatusUpdate;
    type Action = (); // No custom actions; the pipeline drives orders through commands
    type ActionResult = Order;
    type Context = ();
    type Error = PipelineError;

    fn assign_id(seq: u32, _params: &OrderCreate) -> OrderId {
        OrderId(seq)
    }

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        Ok(Self::new(id, params))
    }

    /// An external override. Queue membership is untouched; the
    /// drain loop skips queued orders that are already terminal.
    async fn on_update(&mut self, update: OrderStatusUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.set_status(update.status, update.error);
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<Order, Self::Error> {
        Ok(self.clone())
    }
}
