//! # Pipeline Actor
//!
//! Two priority lanes and a single-slot processor that drains them.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`policy`] - [`PipelinePolicy`]: the lanes and the in-flight slot
//! - [`worker`] - [`PipelineWorker`]: the drain loop
//! - [`actions`] - [`PipelineCommand`]
//! - [`error`] - [`PipelineError`]
//!
//! ## Order lifecycle
//!
//! ```text
//! submit ──► pending ──(next_order)──► processing ──(finish)──► completed | failed
//!               │                                                    ▲
//!               └──────────────── update_status (override) ──────────┘
//! ```
//!
//! The worker waits on the policy's wake signal while both lanes are empty, so a
//! submission to an idle pipeline starts processing right away.

pub mod actions;
pub mod entity;
pub mod error;
pub mod policy;
pub mod worker;

pub use actions::*;
pub use error::*;
pub use policy::PipelinePolicy;
pub use worker::{PipelineWorker, FAILURE_REASON};

use crate::clients::PipelineClient;
use crate::config::SimulationConfig;
use crate::model::Order;
use actor_framework::ResourceActor;

/// Creates the Pipeline actor, its client and the drain-loop worker.
///
/// The worker holds a client clone; spawn it with `worker.run(shutdown)`.
pub fn new(
    config: &SimulationConfig,
) -> (ResourceActor<Order, PipelinePolicy>, PipelineClient, PipelineWorker) {
    let policy = PipelinePolicy::new();
    let wake = policy.wake_signal();
    let (actor, generic_client) = ResourceActor::with_policy(64, policy);
    let client = PipelineClient::new(generic_client);
    let worker = PipelineWorker::new(client.clone(), wake, config);
    (actor, client, worker)
}
