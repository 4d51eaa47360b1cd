//! ActorEntity implementation for the ServiceInstance domain type.
//!
//! Load bookkeeping lives here: request nudges, releases and the periodic decay all
//! go through [`ServiceInstance::set_load`], so load never leaves `[0, 100]`.

use super::{RegistryAction, RegistryError, RegistryTuning};
use crate::model::{InstanceId, ServiceCreate, ServiceInstance, ServiceUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rand::Rng;

/// A random amount in `[0, max)`; zero when `max` is not positive.
fn jitter(max: f64) -> f64 {
    if max > 0.0 {
        rand::thread_rng().gen::<f64>() * max
    } else {
        0.0
    }
}

#[async_trait]
impl ActorEntity for ServiceInstance {
    type Id = InstanceId;
    type Create = ServiceCreate;
    type Update = ServiceUpdate;
    type Action = RegistryAction;
    type ActionResult = ServiceInstance;
    type Context = RegistryTuning;
    type Error = RegistryError;

    fn assign_id(_seq: u32, params: &ServiceCreate) -> InstanceId {
        InstanceId::new(params.role, params.ordinal)
    }

    fn from_create_params(id: InstanceId, _params: ServiceCreate) -> Result<Self, Self::Error> {
        Ok(Self::new(id))
    }

    /// The operator sets the load directly (clamped).
    async fn on_update(
        &mut self,
        update: ServiceUpdate,
        _ctx: &RegistryTuning,
    ) -> Result<(), Self::Error> {
        if let Some(load) = update.load {
            self.set_load(load);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: RegistryAction,
        tuning: &RegistryTuning,
    ) -> Result<ServiceInstance, Self::Error> {
        match action {
            RegistryAction::RecordRequest => {
                self.request_count += 1;
                self.set_load(self.load + jitter(tuning.request_load_max));
            }
            RegistryAction::RecordError => self.error_count += 1,
            RegistryAction::ReleaseLoad => {
                self.set_load(self.load - jitter(tuning.release_load_max));
            }
            RegistryAction::Decay => self.set_load(self.load - tuning.decay_step),
            RegistryAction::InjectFault(enabled) => self.set_fault(enabled),
        }
        Ok(self.clone())
    }
}
