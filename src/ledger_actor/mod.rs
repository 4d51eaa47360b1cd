//! # Ledger Actor
//!
//! Per-product stock and reservation counters with optimistic versioning, under a
//! switchable consistency mode.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Product`]
//! - [`policy`] - [`LedgerPolicy`]: the mode, and reservations that depend on it
//! - [`actions`] - [`LedgerAction`] and [`LedgerCommand`]
//! - [`error`] - [`LedgerError`]
//!
//! ## Consistency modes
//!
//! | Mode | `reserve` | Visible in `reserved` |
//! |------|-----------|-----------------------|
//! | Strong | checked and applied | immediately |
//! | Eventual | checked, then scheduled | after the eventual delay |
//!
//! In eventual mode two reservations inside the delay window are both checked
//! against the same `reserved` value, so together they can exceed `stock`. The
//! anomaly is observable on purpose.

pub mod actions;
pub mod entity;
pub mod error;
pub mod policy;

pub use actions::*;
pub use error::*;
pub use policy::LedgerPolicy;

use crate::clients::LedgerClient;
use crate::config::SimulationConfig;
use crate::model::{seed_catalog, Product};
use actor_framework::ResourceActor;

/// Creates a Ledger actor seeded with the storefront catalog, and its client.
pub fn new(config: &SimulationConfig) -> (ResourceActor<Product, LedgerPolicy>, LedgerClient) {
    let policy = LedgerPolicy::new(config.consistency_mode, config.eventual_delay());
    let (actor, generic_client) = ResourceActor::with_policy(64, policy);
    (
        actor.with_seed(seed_catalog()),
        LedgerClient::new(generic_client),
    )
}
