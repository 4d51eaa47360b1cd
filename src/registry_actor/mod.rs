//! # Registry Actor
//!
//! Owns the simulated service instances: their health, load and request counters, and
//! the active load-balancing strategy.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for
//!   [`ServiceInstance`]
//! - [`policy`] - [`RegistryPolicy`], the selection logic
//! - [`actions`] - [`RegistryAction`] (per instance) and [`RegistryCommand`] (registry-wide)
//! - [`error`] - [`RegistryError`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use storefront_sim::config::SimulationConfig;
//! use storefront_sim::model::ServiceRole;
//! use storefront_sim::registry_actor::{self, RegistryTuning};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SimulationConfig::default();
//!     let (actor, client) = registry_actor::new(&config);
//!     tokio::spawn(actor.run(RegistryTuning::from(&config)));
//!
//!     let instance = client.select(ServiceRole::Order).await?;
//!     assert_eq!(instance.id.to_string(), "order-1");
//!     Ok(())
//! }
//! ```
//!
//! Every instance is registered at startup and never removed. Loads decay by
//! `decay_step` once per `decay_period`.

pub mod actions;
pub mod entity;
pub mod error;
pub mod policy;

pub use actions::*;
pub use error::*;
pub use policy::RegistryPolicy;

use crate::clients::RegistryClient;
use crate::config::SimulationConfig;
use crate::model::{ServiceCreate, ServiceInstance, ServiceRole};
use actor_framework::ResourceActor;

/// Load tuning injected into the registry actor as its context.
#[derive(Debug, Clone)]
pub struct RegistryTuning {
    pub request_load_max: f64,
    pub release_load_max: f64,
    pub decay_step: f64,
}

impl Default for RegistryTuning {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

impl From<&SimulationConfig> for RegistryTuning {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            request_load_max: config.request_load_max,
            release_load_max: config.release_load_max,
            decay_step: config.decay_step,
        }
    }
}

/// The startup pool: `per_role` instances of every role, ids `<role>-1..=per_role`.
pub fn seed(per_role: u32) -> Vec<ServiceCreate> {
    ServiceRole::ALL
        .into_iter()
        .flat_map(|role| (1..=per_role).map(move |ordinal| ServiceCreate { role, ordinal }))
        .collect()
}

/// Creates a seeded Registry actor (with its decay tick) and its client.
pub fn new(
    config: &SimulationConfig,
) -> (ResourceActor<ServiceInstance, RegistryPolicy>, RegistryClient) {
    let (actor, generic_client) =
        ResourceActor::with_policy(64, RegistryPolicy::new(config.load_balancing_strategy));
    let actor = actor
        .with_seed(seed(config.instances_per_role))
        .with_tick(config.decay_period(), || RegistryAction::Decay);
    (actor, RegistryClient::new(generic_client))
}
