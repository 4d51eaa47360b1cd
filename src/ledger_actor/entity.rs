//! ActorEntity implementation for the Product domain type.

use super::{LedgerAction, LedgerError};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = LedgerAction;
    type ActionResult = Product;
    type Context = ();
    type Error = LedgerError;

    fn assign_id(seq: u32, _params: &ProductCreate) -> ProductId {
        ProductId(seq)
    }

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        Ok(Self::new(id, params.name, params.price, params.stock))
    }

    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        self.version += 1;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: LedgerAction,
        _ctx: &(),
    ) -> Result<Product, Self::Error> {
        match action {
            LedgerAction::ApplyReservation(quantity) => self.apply_reservation(quantity),
            LedgerAction::Commit {
                quantity,
                expected_version,
            } => self.commit(quantity, expected_version)?,
            LedgerAction::Release(quantity) => self.release(quantity),
            LedgerAction::Replenish {
                quantity,
                expected_version,
            } => self.replenish(quantity, expected_version)?,
        }
        Ok(self.clone())
    }
}
