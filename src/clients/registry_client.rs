//! # Registry Client
//!
//! High-level API for the Registry actor. Wraps a
//! `ResourceClient<ServiceInstance, RegistryPolicy>` and exposes the registry's
//! operations with [`RegistryError`] results.
use crate::model::{
    HealthSnapshot, InstanceId, LoadBalancingStrategy, ServiceInstance, ServiceRole,
    ServiceUpdate,
};
use crate::registry_actor::{
    RegistryAction, RegistryCommand, RegistryError, RegistryPolicy, RegistryReply,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for interacting with the Registry actor.
#[derive(Clone)]
pub struct RegistryClient {
    inner: ResourceClient<ServiceInstance, RegistryPolicy>,
}

impl RegistryClient {
    pub fn new(inner: ResourceClient<ServiceInstance, RegistryPolicy>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<ServiceInstance, RegistryPolicy> for RegistryClient {
    type Error = RegistryError;

    fn inner(&self) -> &ResourceClient<ServiceInstance, RegistryPolicy> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        RegistryError::from(e)
    }
}

impl RegistryClient {
    async fn action(
        &self,
        id: InstanceId,
        action: RegistryAction,
    ) -> Result<ServiceInstance, RegistryError> {
        Ok(self.inner.perform_action(id, action).await?)
    }

    async fn command(&self, command: RegistryCommand) -> Result<RegistryReply, RegistryError> {
        Ok(self.inner.command(command).await?)
    }

    /// A live instance of `role`, or [`RegistryError::Unavailable`].
    #[instrument(skip(self))]
    pub async fn select(&self, role: ServiceRole) -> Result<ServiceInstance, RegistryError> {
        debug!("Selecting instance");
        match self.command(RegistryCommand::Select(role)).await? {
            RegistryReply::Selected(instance) => Ok(instance),
            _ => unreachable!("Select command must return Selected reply"),
        }
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn record_request(&self, id: InstanceId) -> Result<ServiceInstance, RegistryError> {
        self.action(id, RegistryAction::RecordRequest).await
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn record_error(&self, id: InstanceId) -> Result<ServiceInstance, RegistryError> {
        self.action(id, RegistryAction::RecordError).await
    }

    /// Lowers the load by a random amount now.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn release_load(&self, id: InstanceId) -> Result<ServiceInstance, RegistryError> {
        self.action(id, RegistryAction::ReleaseLoad).await
    }

    /// [`release_load`](Self::release_load), scheduled on the registry after `after`. Fire-and-forget.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn release_load_after(
        &self,
        id: InstanceId,
        after: Duration,
    ) -> Result<(), RegistryError> {
        Ok(self.inner.defer(id, RegistryAction::ReleaseLoad, after).await?)
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn inject_fault(
        &self,
        id: InstanceId,
        enabled: bool,
    ) -> Result<ServiceInstance, RegistryError> {
        self.action(id, RegistryAction::InjectFault(enabled)).await
    }

    /// Sets the load directly, clamped to `[0, 100]`.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn set_load(
        &self,
        id: InstanceId,
        load: f64,
    ) -> Result<ServiceInstance, RegistryError> {
        Ok(self
            .inner
            .update(id, ServiceUpdate { load: Some(load) })
            .await?)
    }

    /// Instances of `role`, in registration order.
    #[instrument(skip(self))]
    pub async fn services_by_role(
        &self,
        role: ServiceRole,
    ) -> Result<Vec<ServiceInstance>, RegistryError> {
        let mut services = self.list().await?;
        services.retain(|s| s.role == role);
        Ok(services)
    }

    #[instrument(skip(self))]
    pub async fn set_strategy(&self, strategy: LoadBalancingStrategy) -> Result<(), RegistryError> {
        self.command(RegistryCommand::SetStrategy(strategy)).await?;
        Ok(())
    }

    pub async fn strategy(&self) -> Result<LoadBalancingStrategy, RegistryError> {
        match self.command(RegistryCommand::Strategy).await? {
            RegistryReply::Strategy(strategy) => Ok(strategy),
            _ => unreachable!("Strategy command must return Strategy reply"),
        }
    }

    /// Full instance list plus the active strategy.
    pub async fn health(&self) -> Result<HealthSnapshot, RegistryError> {
        match self.command(RegistryCommand::Health).await? {
            RegistryReply::Health(snapshot) => Ok(snapshot),
            _ => unreachable!("Health command must return Health reply"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::{create_mock_client, expect_command, MockClient};

    #[tokio::test]
    async fn select_surfaces_unavailable_role() {
        let (client, mut receiver) = create_mock_client::<ServiceInstance, RegistryPolicy>(10);
        let registry = RegistryClient::new(client);

        let task = tokio::spawn(async move { registry.select(ServiceRole::Payment).await });

        let (command, responder) = expect_command(&mut receiver)
            .await
            .expect("Expected Command request");
        assert!(matches!(command, RegistryCommand::Select(ServiceRole::Payment)));
        responder
            .send(Err(FrameworkError::EntityError(Box::new(
                RegistryError::Unavailable(ServiceRole::Payment),
            ))))
            .unwrap();

        let result = task.await.unwrap();
        assert_eq!(
            result.unwrap_err(),
            RegistryError::Unavailable(ServiceRole::Payment)
        );
    }

    #[tokio::test]
    async fn unknown_instance_maps_to_not_found() {
        let mut mock = MockClient::<ServiceInstance, RegistryPolicy>::new();
        let id = InstanceId::new(ServiceRole::Auth, 9);
        mock.expect_action(id)
            .return_err(FrameworkError::NotFound(id.to_string()));

        let registry = RegistryClient::new(mock.client());
        let err = registry.inject_fault(id, true).await.unwrap_err();
        assert_eq!(err, RegistryError::NotFound("auth-9".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn deferred_release_is_fire_and_forget() {
        let mut mock = MockClient::<ServiceInstance, RegistryPolicy>::new();
        let id = InstanceId::new(ServiceRole::Order, 1);
        mock.expect_defer(id);

        let registry = RegistryClient::new(mock.client());
        registry
            .release_load_after(id, Duration::from_millis(100))
            .await
            .unwrap();
        // Let the mock task consume the queued request.
        tokio::time::sleep(Duration::from_millis(10)).await;
        mock.verify();
    }
}
