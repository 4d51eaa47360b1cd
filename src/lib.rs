//! # Storefront Service-Mesh Simulation
//!
//! > **A simulated storefront backend, built from resource-oriented actors.**
//!
//! Three components carry all the state, each one an actor that serializes access to
//! what it owns:
//!
//! - **Service registry** ([`registry_actor`]): simulated instances of five service
//!   roles, with load, health, fault injection and round-robin or least-load selection.
//! - **Inventory ledger** ([`ledger_actor`]): stock and reservation counters with
//!   optimistic versioning, in strong or eventual consistency mode.
//! - **Order pipeline** ([`pipeline_actor`]): two priority lanes drained one order at a
//!   time by a worker task.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine (`actor_framework`)
//! The generic `ResourceActor<T, P>` from the workspace's `actor-framework` crate. It owns
//! an entity store, processes CRUD and action messages in order, and runs deferred work
//! and periodic ticks on its own task.
//!
//! ### 2. The Data ([`model`])
//! Plain serde types: [`ServiceInstance`](model::ServiceInstance),
//! [`Product`](model::Product), [`Order`](model::Order), and the snapshots built from
//! them.
//!
//! ### 3. The Actors ([`registry_actor`], [`ledger_actor`], [`pipeline_actor`])
//! Each implements `ActorEntity` for its entity and `StorePolicy` for collection-wide
//! state: the strategy and round-robin counters, the consistency mode, the queues.
//!
//! ### 4. The Interface ([`clients`])
//! Typed wrappers around `ResourceClient`, one per actor, with each actor's own error
//! type.
//!
//! ### 5. The Request Layer ([`gateway`])
//! Routes every request through a leased service instance, places orders end to end,
//! charges payments, settles reservations and applies admin actions.
//!
//! ### 6. The Orchestrator ([`lifecycle`])
//! [`StorefrontSystem`](lifecycle::StorefrontSystem) spawns everything and shuts it down
//! in order.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! STOREFRONT_CONFIG=storefront.json RUST_LOG=debug cargo run
//! ```
//!
//! See [`config`] for the tunables.

pub mod clients;
pub mod config;
pub mod gateway;
pub mod ledger_actor;
pub mod lifecycle;
pub mod model;
pub mod pipeline_actor;
pub mod registry_actor;
