//! # Generic Messages
//!
//! The message types exchanged between a `ResourceClient` and its `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::policy::StorePolicy;
use std::time::Duration;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The CRUD variants address one entity through the [`ActorEntity`] hooks.
/// `Action` runs a custom entity operation; `Defer` schedules one to run later without
/// waiting for it. `Command` addresses the whole store through the actor's
/// [`StorePolicy`].
pub enum ResourceRequest<T: ActorEntity, P: StorePolicy<T> = ()> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Defer {
        id: T::Id,
        action: T::Action,
        after: Duration,
    },
    Command {
        command: P::Command,
        respond_to: Response<P::Reply>,
    },
}
