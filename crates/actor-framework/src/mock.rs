//! # Mock Framework & Testing Guide
//!
//! `MockClient<T, P>` hands out a real `ResourceClient<T, P>` whose requests are
//! answered from a queue of expectations instead of an actor. Use it to test client
//! wrappers and orchestration code without spawning actors.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | No real state (expectations) | Real state management |
//! | **Use Case** | Logic *around* the client | The actor itself or the full system |
//! | **Error Injection** | Easy (`return_err`) | Requires specific state |
//!
//! Expectations are consumed in the order they were registered. A request that does
//! not match the next expectation panics the mock task; the caller then sees
//! `FrameworkError::ActorDropped`. Call [`MockClient::verify`] at the end of a test to
//! make sure nothing was left unconsumed.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Meter { id: u32 }
//! #[derive(Debug)] struct MeterCreate;
//! #[derive(Debug)] struct MeterUpdate;
//! #[derive(Debug)] enum MeterAction {}
//! #[derive(Debug, thiserror::Error)] #[error("Err")] struct MeterError;
//!
//! #[async_trait]
//! impl ActorEntity for Meter {
//!     type Id = u32; type Create = MeterCreate; type Update = MeterUpdate;
//!     type Action = MeterAction; type ActionResult = (); type Context = (); type Error = MeterError;
//!     fn assign_id(seq: u32, _: &MeterCreate) -> u32 { seq }
//!     fn from_create_params(id: u32, _: MeterCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: MeterUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: MeterAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Meter>::new();
//!     let client = mock.client();
//!
//!     // Simulate a downstream failure
//!     mock.expect_get(1).return_err(FrameworkError::ActorClosed);
//!
//!     let result = client.get(1).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! For the lower-level style, [`create_mock_client`] returns a client plus the raw
//! request receiver, and the `expect_*` helpers pull typed requests off it.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::policy::StorePolicy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

enum Expectation<T: ActorEntity, P: StorePolicy<T>> {
    Get {
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
    Defer {
        id: T::Id,
    },
    Command {
        response: Result<P::Reply, FrameworkError>,
    },
}

type Expectations<T, P> = Arc<Mutex<VecDeque<Expectation<T, P>>>>;

fn push<T: ActorEntity, P: StorePolicy<T>>(exps: &Expectations<T, P>, exp: Expectation<T, P>) {
    exps.lock()
        .expect("mock expectations poisoned")
        .push_back(exp);
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity, P: StorePolicy<T> = ()> {
    client: ResourceClient<T, P>,
    expectations: Expectations<T, P>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity, P: StorePolicy<T>> Default for MockClient<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity, P: StorePolicy<T>> MockClient<T, P> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T, P>>(100);
        let expectations: Expectations<T, P> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().expect("mock expectations poisoned").pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "action sent to unexpected entity");
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Defer { id, .. }, Some(Expectation::Defer { id: expected })) => {
                        assert_eq!(id, expected, "deferred action for unexpected entity");
                    }
                    (
                        ResourceRequest::Command { respond_to, .. },
                        Some(Expectation::Command { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T, P> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, _id: T::Id) -> ResponseBuilder<T, P, Option<T>> {
        ResponseBuilder::new(&self.expectations, |response| Expectation::Get { response })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ResponseBuilder<T, P, T::Id> {
        ResponseBuilder::new(&self.expectations, |response| Expectation::Create {
            response,
        })
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ResponseBuilder<T, P, Vec<T>> {
        ResponseBuilder::new(&self.expectations, |response| Expectation::List { response })
    }

    /// Expects an `action` on entity `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ResponseBuilder<T, P, T::ActionResult> {
        ResponseBuilder::new(&self.expectations, move |response| Expectation::Action {
            id,
            response,
        })
    }

    /// Expects a store-policy `command`.
    pub fn expect_command(&mut self) -> ResponseBuilder<T, P, P::Reply> {
        ResponseBuilder::new(&self.expectations, |response| Expectation::Command {
            response,
        })
    }

    /// Expects a deferred action for entity `id`. Deferrals have no response.
    pub fn expect_defer(&mut self, id: T::Id) {
        push(&self.expectations, Expectation::Defer { id });
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .expect("mock expectations poisoned")
            .len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

type MakeExpectation<T, P, R> =
    Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T, P> + Send>;

/// Completes an expectation with its canned response.
pub struct ResponseBuilder<T: ActorEntity, P: StorePolicy<T>, R> {
    expectations: Expectations<T, P>,
    make: MakeExpectation<T, P, R>,
}

impl<T: ActorEntity, P: StorePolicy<T>, R> ResponseBuilder<T, P, R> {
    fn new(
        expectations: &Expectations<T, P>,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T, P> + Send + 'static,
    ) -> Self {
        Self {
            expectations: expectations.clone(),
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        push(&self.expectations, (self.make)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        push(&self.expectations, (self.make)(Err(error)));
    }
}

// =============================================================================
// RAW RECEIVER HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the actor: it pulls requests off `receiver` and answers them through
/// the enclosed responders, which makes delays and odd orderings easy to simulate.
pub fn create_mock_client<T: ActorEntity, P: StorePolicy<T>>(
    buffer_size: usize,
) -> (ResourceClient<T, P>, mpsc::Receiver<ResourceRequest<T, P>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity, P: StorePolicy<T>>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T, P>>,
) -> Option<(
    T::Id,
    T::Action,
    tokio::sync::oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Command request
pub async fn expect_command<T: ActorEntity, P: StorePolicy<T>>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T, P>>,
) -> Option<(
    P::Command,
    tokio::sync::oneshot::Sender<Result<P::Reply, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Command {
            command,
            respond_to,
        }) => Some((command, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Defer request
pub async fn expect_defer<T: ActorEntity, P: StorePolicy<T>>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T, P>>,
) -> Option<(T::Id, T::Action, Duration)> {
    match receiver.recv().await {
        Some(ResourceRequest::Defer { id, action, after }) => Some((id, action, after)),
        _ => None,
    }
}
