//! # Actor Framework
//!
//! Building blocks for type-safe actor systems on Tokio. Each actor owns a collection
//! of entities and processes requests one at a time, which gives every collection a
//! single serialization point without locks.
//!
//! ## Layers
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - per-entity business logic: creation,
//!    updates, and custom actions.
//! 2. **Store Layer** ([`StorePolicy`], [`Store`]) - collection-wide state and the
//!    commands that need it (selection among entities, global modes, queues).
//! 3. **Runtime Layer** ([`ResourceActor`]) - the message loop, deferred actions
//!    ([`DeferredQueue`]) and periodic ticks.
//! 4. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed async requests.
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug)]
//! struct Counter {
//!     id: u32,
//!     value: u64,
//! }
//!
//! #[derive(Debug)] struct CounterCreate;
//! #[derive(Debug)] struct CounterUpdate { value: u64 }
//! #[derive(Debug)] enum CounterAction { Bump }
//! #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = u32;
//!     type Create = CounterCreate;
//!     type Update = CounterUpdate;
//!     type Action = CounterAction;
//!     type ActionResult = u64;
//!     type Context = ();
//!     type Error = CounterError;
//!
//!     fn assign_id(seq: u32, _: &CounterCreate) -> u32 { seq }
//!
//!     fn from_create_params(id: u32, _: CounterCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, value: 0 })
//!     }
//!
//!     async fn on_update(&mut self, update: CounterUpdate, _: &()) -> Result<(), Self::Error> {
//!         self.value = update.value;
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u64, Self::Error> {
//!         self.value += 1;
//!         Ok(self.value)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Counter>::new(10);
//!     tokio::spawn(actor.with_seed([CounterCreate]).run(()));
//!
//!     assert_eq!(client.perform_action(1, CounterAction::Bump).await.unwrap(), 1);
//!
//!     client.defer(1, CounterAction::Bump, Duration::from_millis(10)).await.unwrap();
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     assert_eq!(client.get(1).await.unwrap().unwrap().value, 2);
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies are injected when the actor starts, through `run(context)`, not at
//! construction. Actors can therefore be created first and wired afterwards, and tests
//! can inject mocks (see [`mock`]).
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task.
//! - Requests, deferred actions and ticks are processed **sequentially** within an actor.
//! - Different actors run in parallel and share nothing but channels.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod policy;
pub mod schedule;
pub mod telemetry;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use policy::{Store, StorePolicy};
pub use schedule::DeferredQueue;
