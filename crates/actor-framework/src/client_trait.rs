//! # ActorClient Trait
//!
//! Common interface for resource-specific clients: default `get` and `list` built on
//! top of a generic `ResourceClient`, with errors mapped to the resource's own type.
use crate::{ActorEntity, FrameworkError, ResourceClient, StorePolicy};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Sensor { id: u32 }
/// #[derive(Debug)] struct SensorCreate;
/// #[derive(Debug)] struct SensorUpdate;
/// #[derive(Debug)] enum SensorAction {}
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct SensorError(String);
///
/// #[async_trait]
/// impl ActorEntity for Sensor {
///     type Id = u32;
///     type Create = SensorCreate;
///     type Update = SensorUpdate;
///     type Action = SensorAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = SensorError;
///
///     fn assign_id(seq: u32, _: &SensorCreate) -> u32 { seq }
///     fn from_create_params(id: u32, _: SensorCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id })
///     }
///     async fn on_update(&mut self, _: SensorUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: SensorAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct SensorClient {
///     inner: ResourceClient<Sensor>,
/// }
///
/// #[async_trait]
/// impl ActorClient<Sensor> for SensorClient {
///     type Error = SensorError;
///
///     fn inner(&self) -> &ResourceClient<Sensor> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         SensorError(e.to_string())
///     }
/// }
///
/// async fn usage(client: SensorClient) {
///     // get() and list() are provided automatically
///     let _ = client.get(1).await;
///     let _ = client.list().await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity, P: StorePolicy<T> = ()>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T, P>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every entity, in creation order.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }
}
