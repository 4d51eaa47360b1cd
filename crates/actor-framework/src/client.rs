//! # Generic Client
//!
//! This module defines the generic client for communicating with actors.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Response};
use crate::policy::StorePolicy;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only the channel sender, so cloning is cheap. Every request method
/// resolves to `Result<…, FrameworkError>`; `defer` only waits for the request to be
/// queued, not for the action to run.
pub struct ResourceClient<T: ActorEntity, P: StorePolicy<T> = ()> {
    sender: mpsc::Sender<ResourceRequest<T, P>>,
}

impl<T: ActorEntity, P: StorePolicy<T>> Clone for ResourceClient<T, P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity, P: StorePolicy<T>> ResourceClient<T, P> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T, P>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T, P>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// All entities, in creation order.
    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Schedules `action` on entity `id` after `after`. Fire-and-forget.
    pub async fn defer(
        &self,
        id: T::Id,
        action: T::Action,
        after: Duration,
    ) -> Result<(), FrameworkError> {
        self.sender
            .send(ResourceRequest::Defer { id, action, after })
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }

    /// Sends a collection-level command to the actor's store policy.
    pub async fn command(&self, command: P::Command) -> Result<P::Reply, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Command {
            command,
            respond_to,
        })
        .await
    }
}
