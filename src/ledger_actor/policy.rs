//! Consistency-mode handling for reservations.

use super::{LedgerAction, LedgerCommand, LedgerError, LedgerReply};
use crate::model::{ConsistencyMode, InventorySnapshot, Product, ProductId};
use actor_framework::{Store, StorePolicy};
use std::time::Duration;
use tracing::{debug, info};

/// Ledger-wide state: the consistency mode and the eventual-mode delay.
///
/// Changing either only affects reservations made afterwards; holds already
/// scheduled keep their original deadline.
#[derive(Debug)]
pub struct LedgerPolicy {
    mode: ConsistencyMode,
    eventual_delay: Duration,
}

impl LedgerPolicy {
    pub fn new(mode: ConsistencyMode, eventual_delay: Duration) -> Self {
        Self {
            mode,
            eventual_delay,
        }
    }

    fn reserve(
        &self,
        store: &mut Store<Product>,
        id: ProductId,
        quantity: u32,
        expected_version: Option<u64>,
    ) -> Result<Product, LedgerError> {
        let product = store
            .get_mut(&id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        product.check_version(expected_version)?;
        product.check_available(quantity)?;

        match self.mode {
            ConsistencyMode::Strong => {
                product.apply_reservation(quantity);
                Ok(product.clone())
            }
            ConsistencyMode::Eventual => {
                // Later availability checks do not see this hold until it is applied.
                let snapshot = product.clone();
                store.defer(
                    self.eventual_delay,
                    id,
                    LedgerAction::ApplyReservation(quantity),
                );
                debug!(%id, quantity, delay = ?self.eventual_delay, "Reservation deferred");
                Ok(snapshot)
            }
        }
    }
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self::new(ConsistencyMode::Strong, Duration::from_millis(2000))
    }
}

impl StorePolicy<Product> for LedgerPolicy {
    type Command = LedgerCommand;
    type Reply = LedgerReply;

    fn handle_command(
        &mut self,
        command: LedgerCommand,
        store: &mut Store<Product>,
        _ctx: &(),
    ) -> Result<LedgerReply, LedgerError> {
        match command {
            LedgerCommand::Reserve {
                id,
                quantity,
                expected_version,
            } => {
                let product = self.reserve(store, id, quantity, expected_version)?;
                Ok(LedgerReply::Reserved {
                    product,
                    mode: self.mode,
                })
            }
            LedgerCommand::SetMode(mode) => {
                info!(from = %self.mode, to = %mode, "Consistency mode changed");
                self.mode = mode;
                Ok(LedgerReply::Mode(mode))
            }
            LedgerCommand::Mode => Ok(LedgerReply::Mode(self.mode)),
            LedgerCommand::SetEventualDelay(delay) => {
                self.eventual_delay = delay;
                Ok(LedgerReply::EventualDelay(delay))
            }
            LedgerCommand::Snapshot => Ok(LedgerReply::Snapshot(InventorySnapshot {
                products: store.iter().cloned().collect(),
                consistency_mode: self.mode,
            })),
        }
    }
}
