//! Custom actions and store commands for the Ledger actor.

use crate::model::{ConsistencyMode, InventorySnapshot, Product, ProductId};
use std::time::Duration;

/// Per-product mutations. Each one bumps the product's version when it succeeds.
///
/// `expected_version`, when present, must match the current version or the action
/// fails with [`LedgerError::Conflict`](super::LedgerError::Conflict) and changes
/// nothing.
#[derive(Debug, Clone)]
pub enum LedgerAction {
    /// Adds to `reserved` without an availability check. Scheduled by eventual-mode
    /// reservations, which were checked when requested.
    ApplyReservation(u32),
    /// Debits reserved units from stock.
    Commit {
        quantity: u32,
        expected_version: Option<u64>,
    },
    /// Returns reserved units, clamping at zero. Never fails.
    Release(u32),
    Replenish {
        quantity: u32,
        expected_version: Option<u64>,
    },
}

/// Ledger-wide operations.
#[derive(Debug, Clone)]
pub enum LedgerCommand {
    /// Reservations depend on the consistency mode, so they go through the store.
    Reserve {
        id: ProductId,
        quantity: u32,
        expected_version: Option<u64>,
    },
    SetMode(ConsistencyMode),
    Mode,
    SetEventualDelay(Duration),
    Snapshot,
}

#[derive(Debug, Clone)]
pub enum LedgerReply {
    /// The product as of the reply; in eventual mode the hold is not applied yet.
    Reserved {
        product: Product,
        mode: ConsistencyMode,
    },
    Mode(ConsistencyMode),
    EventualDelay(Duration),
    Snapshot(InventorySnapshot),
}
