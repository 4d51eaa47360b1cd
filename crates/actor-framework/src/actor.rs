//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns a [`Store`] of
//! entities and processes messages sequentially, so the store needs no locks.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::policy::{Store, StorePolicy};
use crate::schedule::sleep_until_due;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

type TickFn<T> = Box<dyn Fn() -> <T as ActorEntity>::Action + Send + Sync>;

struct Tick<T: ActorEntity> {
    period: Duration,
    make_action: TickFn<T>,
}

/// The generic actor that manages a collection of entities.
///
/// Besides the request channel, the loop watches two clocks:
///
/// * **Deferred actions** scheduled through [`Store::defer`] or
///   [`ResourceClient::defer`] are applied to their entity when due.
/// * An optional **tick** ([`ResourceActor::with_tick`]) applies an action to every
///   entity once per period.
///
/// Both run on the actor task between messages, so they are serialized with every
/// other request.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor (server) and client.
/// 2. **Seed**: optionally queue initial entities with [`ResourceActor::with_seed`].
/// 3. **Run**: spawn `actor.run(context)`; seeds are created first, with the context.
pub struct ResourceActor<T: ActorEntity, P: StorePolicy<T> = ()> {
    receiver: mpsc::Receiver<ResourceRequest<T, P>>,
    store: Store<T>,
    policy: P,
    seed: Vec<T::Create>,
    tick: Option<Tick<T>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates an actor without a store policy.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::with_policy(buffer_size, ())
    }
}

impl<T: ActorEntity, P: StorePolicy<T>> ResourceActor<T, P> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; clients wait when it is
    /// full.
    pub fn with_policy(buffer_size: usize, policy: P) -> (Self, ResourceClient<T, P>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Store::new(),
            policy,
            seed: Vec::new(),
            tick: None,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Entities created, in order, when the actor starts.
    pub fn with_seed(mut self, seed: impl IntoIterator<Item = T::Create>) -> Self {
        self.seed.extend(seed);
        self
    }

    /// Applies `make_action()` to every entity once per `period`.
    pub fn with_tick(
        mut self,
        period: Duration,
        make_action: impl Fn() -> T::Action + Send + Sync + 'static,
    ) -> Self {
        self.tick = Some(Tick {
            period,
            make_action: Box::new(make_action),
        });
        self
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// Deferred actions still pending at shutdown are dropped.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, seeds = self.seed.len(), "Actor started");

        for params in std::mem::take(&mut self.seed) {
            if let Err(e) = self.create(params, &context, entity_type).await {
                warn!(entity_type, error = %e, "Seed failed");
            }
        }

        let (mut ticker, make_action) = match self.tick.take() {
            Some(tick) if tick.period.is_zero() => {
                warn!(entity_type, "Zero tick period, ticks disabled");
                (None, None)
            }
            Some(tick) => {
                let mut ticker = interval_at(Instant::now() + tick.period, tick.period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                (Some(ticker), Some(tick.make_action))
            }
            None => (None, None),
        };

        loop {
            let due = self.store.deferred_mut().next_due();
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.dispatch(msg, &context, entity_type).await,
                    None => break,
                },
                _ = sleep_until_due(due) => self.fire_deferred(&context, entity_type).await,
                _ = next_tick(&mut ticker) => {
                    if let Some(make_action) = &make_action {
                        self.broadcast(make_action, &context, entity_type).await;
                    }
                }
            }
        }

        info!(
            entity_type,
            size = self.store.len(),
            dropped_deferred = self.store.pending_deferred(),
            "Shutdown"
        );
    }

    async fn create(
        &mut self,
        params: T::Create,
        context: &T::Context,
        entity_type: &str,
    ) -> Result<T::Id, FrameworkError> {
        debug!(entity_type, ?params, "Create");
        let id = T::assign_id(self.store.next_seq(), &params);
        if self.store.contains(&id) {
            warn!(entity_type, %id, "Already exists");
            return Err(FrameworkError::AlreadyExists(id.to_string()));
        }
        let mut item = T::from_create_params(id.clone(), params).map_err(|e| {
            warn!(entity_type, error = %e, "Create failed");
            FrameworkError::EntityError(Box::new(e))
        })?;
        if let Err(e) = item.on_create(context).await {
            warn!(entity_type, error = %e, "on_create failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }
        self.store.insert(id.clone(), item);
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }

    async fn dispatch(
        &mut self,
        msg: ResourceRequest<T, P>,
        context: &T::Context,
        entity_type: &str,
    ) {
        match msg {
            ResourceRequest::Create { params, respond_to } => {
                let result = self.create(params, context, entity_type).await;
                let _ = respond_to.send(result);
            }
            ResourceRequest::Get { id, respond_to } => {
                let item = self.store.get(&id).cloned();
                debug!(entity_type, %id, found = item.is_some(), "Get");
                let _ = respond_to.send(Ok(item));
            }
            ResourceRequest::List { respond_to } => {
                debug!(entity_type, size = self.store.len(), "List");
                let _ = respond_to.send(Ok(self.store.iter().cloned().collect()));
            }
            ResourceRequest::Update {
                id,
                update,
                respond_to,
            } => {
                debug!(entity_type, %id, ?update, "Update");
                let Some(item) = self.store.get_mut(&id) else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    return;
                };
                let result = match item.on_update(update, context).await {
                    Ok(()) => {
                        info!(entity_type, %id, "Updated");
                        Ok(item.clone())
                    }
                    Err(e) => {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        Err(FrameworkError::EntityError(Box::new(e)))
                    }
                };
                let _ = respond_to.send(result);
            }
            ResourceRequest::Delete { id, respond_to } => {
                debug!(entity_type, %id, "Delete");
                let Some(item) = self.store.get(&id) else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    return;
                };
                if let Err(e) = item.on_delete(context).await {
                    warn!(entity_type, %id, error = %e, "on_delete failed");
                    let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                    return;
                }
                self.store.remove(&id);
                info!(entity_type, %id, size = self.store.len(), "Deleted");
                let _ = respond_to.send(Ok(()));
            }
            ResourceRequest::Action {
                id,
                action,
                respond_to,
            } => {
                let result = self.apply_action(id, action, context, entity_type).await;
                let _ = respond_to.send(result);
            }
            ResourceRequest::Defer { id, action, after } => {
                debug!(entity_type, %id, ?action, ?after, "Defer");
                self.store.defer(after, id, action);
            }
            ResourceRequest::Command {
                command,
                respond_to,
            } => {
                debug!(entity_type, ?command, "Command");
                let result = self
                    .policy
                    .handle_command(command, &mut self.store, context)
                    .map_err(|e| {
                        warn!(entity_type, error = %e, "Command failed");
                        FrameworkError::EntityError(Box::new(e))
                    });
                let _ = respond_to.send(result);
            }
        }
    }

    async fn apply_action(
        &mut self,
        id: T::Id,
        action: T::Action,
        context: &T::Context,
        entity_type: &str,
    ) -> Result<T::ActionResult, FrameworkError> {
        debug!(entity_type, %id, ?action, "Action");
        let Some(item) = self.store.get_mut(&id) else {
            warn!(entity_type, %id, "Not found");
            return Err(FrameworkError::NotFound(id.to_string()));
        };
        match item.handle_action(action, context).await {
            Ok(result) => {
                debug!(entity_type, %id, "Action ok");
                Ok(result)
            }
            Err(e) => {
                warn!(entity_type, %id, error = %e, "Action failed");
                Err(FrameworkError::EntityError(Box::new(e)))
            }
        }
    }

    async fn fire_deferred(&mut self, context: &T::Context, entity_type: &str) {
        let now = Instant::now();
        while let Some((id, action)) = self.store.deferred_mut().pop_due(now) {
            debug!(entity_type, %id, "Deferred action due");
            // Failures are already logged; nobody is waiting for the result.
            let _ = self.apply_action(id, action, context, entity_type).await;
        }
    }

    async fn broadcast(
        &mut self,
        make_action: &TickFn<T>,
        context: &T::Context,
        entity_type: &str,
    ) {
        for id in self.store.ids() {
            let Some(item) = self.store.get_mut(&id) else {
                continue;
            };
            if let Err(e) = item.handle_action(make_action(), context).await {
                warn!(entity_type, %id, error = %e, "Tick failed");
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
