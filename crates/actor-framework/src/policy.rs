//! # Store & Store Policies
//!
//! CRUD and actions address one entity at a time. Some operations need the whole
//! collection plus state that belongs to no single entity: picking one of several
//! entities by a balancing rule, switching a mode that governs later requests, popping
//! the next item of a queue. A [`StorePolicy`] owns that collection-wide state and
//! handles these requests as `Command`s, with mutable access to the [`Store`].
//!
//! Commands run inside the actor loop like every other request, so a policy never
//! observes a half-applied mutation.

use crate::entity::ActorEntity;
use crate::schedule::DeferredQueue;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Debug;
use std::time::Duration;

/// The entities owned by one `ResourceActor`, in creation order.
pub struct Store<T: ActorEntity> {
    entities: HashMap<T::Id, T>,
    order: Vec<T::Id>,
    next_seq: u32,
    deferred: DeferredQueue<(T::Id, T::Action)>,
}

impl<T: ActorEntity> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> Store<T> {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            order: Vec::new(),
            next_seq: 1,
            deferred: DeferredQueue::new(),
        }
    }

    /// Takes the next creation sequence number.
    pub fn next_seq(&mut self) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        self.entities.get_mut(id)
    }

    /// Inserts a new entity, or replaces an existing one in place.
    pub fn insert(&mut self, id: T::Id, item: T) {
        if self.entities.insert(id.clone(), item).is_none() {
            self.order.push(id);
        }
    }

    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let item = self.entities.remove(id)?;
        self.order.retain(|other| other != id);
        Some(item)
    }

    /// Iterates in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Snapshot of the ids in creation order.
    pub fn ids(&self) -> Vec<T::Id> {
        self.order.clone()
    }

    /// Applies `action` to entity `id` once `after` has elapsed.
    ///
    /// There is no cancellation; a deferred action for an entity that no longer
    /// exists is logged and dropped when it falls due.
    pub fn defer(&mut self, after: Duration, id: T::Id, action: T::Action) {
        self.deferred.schedule(after, (id, action));
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    pub(crate) fn deferred_mut(&mut self) -> &mut DeferredQueue<(T::Id, T::Action)> {
        &mut self.deferred
    }
}

/// Collection-level request handler for a `ResourceActor`.
///
/// The default policy `()` accepts no commands.
pub trait StorePolicy<T: ActorEntity>: Send + 'static {
    /// Collection-level requests (e.g., `Select(role)`).
    type Command: Send + Debug;

    /// Result type of commands.
    type Reply: Send + Debug;

    fn handle_command(
        &mut self,
        command: Self::Command,
        store: &mut Store<T>,
        ctx: &T::Context,
    ) -> Result<Self::Reply, T::Error>;
}

impl<T: ActorEntity> StorePolicy<T> for () {
    type Command = Infallible;
    type Reply = ();

    fn handle_command(
        &mut self,
        command: Infallible,
        _store: &mut Store<T>,
        _ctx: &T::Context,
    ) -> Result<(), T::Error> {
        match command {}
    }
}
