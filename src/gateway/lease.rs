//! Routing a request to a service instance.

use super::GatewayError;
use crate::clients::RegistryClient;
use crate::model::{InstanceId, ServiceRole};
use std::time::Duration;
use tracing::{debug, warn};

/// A request's hold on one instance of a role.
///
/// Acquiring selects an instance and records the request on it, which nudges its load
/// up. The holder must finish with [`release`](Self::release) or
/// [`fail`](Self::fail); both schedule the load decrease on the registry instead of
/// waiting for it.
#[must_use = "a lease must be released or failed"]
pub struct InstanceLease {
    registry: RegistryClient,
    id: InstanceId,
    release_after: Duration,
}

impl InstanceLease {
    /// Selects a live instance of `role`. Fails with [`GatewayError::Unavailable`]
    /// when every instance of the role is down.
    pub async fn acquire(
        registry: &RegistryClient,
        role: ServiceRole,
        release_after: Duration,
    ) -> Result<Self, GatewayError> {
        let instance = registry.select(role).await?;
        registry.record_request(instance.id).await?;
        debug!(id = %instance.id, load = instance.load, "Lease acquired");
        Ok(Self {
            registry: registry.clone(),
            id: instance.id,
            release_after,
        })
    }

    pub fn instance_id(&self) -> InstanceId {
        self.id
    }

    /// Ends the request normally.
    pub async fn release(self) {
        if let Err(e) = self
            .registry
            .release_load_after(self.id, self.release_after)
            .await
        {
            warn!(id = %self.id, error = %e, "Failed to schedule load release");
        }
    }

    /// Ends the request as a failure: records an error on the instance, then releases.
    pub async fn fail(self) {
        if let Err(e) = self.registry.record_error(self.id).await {
            warn!(id = %self.id, error = %e, "Failed to record error");
        }
        self.release().await;
    }
}
