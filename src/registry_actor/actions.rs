//! Custom actions and store commands for the Registry actor.
//!
//! Actions address one [`ServiceInstance`](crate::model::ServiceInstance) and are
//! handled by its [`ActorEntity::handle_action`](actor_framework::ActorEntity::handle_action).
//! Commands address the whole registry and are handled by
//! [`RegistryPolicy`](super::RegistryPolicy).

use crate::model::{HealthSnapshot, LoadBalancingStrategy, ServiceInstance, ServiceRole};

/// Per-instance operations.
#[derive(Debug, Clone)]
pub enum RegistryAction {
    /// A request was routed here: bump the counter and nudge the load up.
    RecordRequest,
    /// A request routed here failed. Status is left alone.
    RecordError,
    /// A request finished: drop the load by a random amount.
    ReleaseLoad,
    /// Periodic relaxation toward zero.
    Decay,
    /// Operator fault injection; `true` takes the instance out of selection.
    InjectFault(bool),
}

/// Registry-wide operations.
#[derive(Debug, Clone)]
pub enum RegistryCommand {
    /// Pick a live instance of the role under the active strategy.
    Select(ServiceRole),
    SetStrategy(LoadBalancingStrategy),
    Strategy,
    Health,
}

#[derive(Debug, Clone)]
pub enum RegistryReply {
    Selected(ServiceInstance),
    Strategy(LoadBalancingStrategy),
    Health(HealthSnapshot),
}
