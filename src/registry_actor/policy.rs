//! Load balancing over the registry's instances.

use super::{RegistryCommand, RegistryError, RegistryReply, RegistryTuning};
use crate::model::{HealthSnapshot, LoadBalancingStrategy, ServiceInstance, ServiceRole};
use actor_framework::{Store, StorePolicy};
use std::collections::HashMap;
use tracing::info;

/// Registry-wide state: the active strategy and one round-robin counter per role.
#[derive(Debug, Default)]
pub struct RegistryPolicy {
    strategy: LoadBalancingStrategy,
    round_robin: HashMap<ServiceRole, usize>,
}

impl RegistryPolicy {
    pub fn new(strategy: LoadBalancingStrategy) -> Self {
        Self {
            strategy,
            round_robin: HashMap::new(),
        }
    }

    /// Picks one live instance of `role`.
    ///
    /// Candidates are the non-down instances in registration order. Round-robin takes
    /// `candidates[counter % n]` and advances the role's counter on every call;
    /// least-load takes the minimum load, first candidate on ties.
    pub fn select<'a>(
        &mut self,
        role: ServiceRole,
        instances: impl Iterator<Item = &'a ServiceInstance>,
    ) -> Result<&'a ServiceInstance, RegistryError> {
        let candidates: Vec<&ServiceInstance> = instances
            .filter(|s| s.role == role && s.is_available())
            .collect();
        if candidates.is_empty() {
            return Err(RegistryError::Unavailable(role));
        }

        let selected = match self.strategy {
            LoadBalancingStrategy::RoundRobin => {
                let counter = self.round_robin.entry(role).or_insert(0);
                let selected = candidates[*counter % candidates.len()];
                *counter = counter.wrapping_add(1);
                selected
            }
            LoadBalancingStrategy::LeastLoad => candidates
                .iter()
                .copied()
                .reduce(|best, s| if s.load < best.load { s } else { best })
                .ok_or(RegistryError::Unavailable(role))?,
        };
        Ok(selected)
    }
}

impl StorePolicy<ServiceInstance> for RegistryPolicy {
    type Command = RegistryCommand;
    type Reply = RegistryReply;

    fn handle_command(
        &mut self,
        command: RegistryCommand,
        store: &mut Store<ServiceInstance>,
        _tuning: &RegistryTuning,
    ) -> Result<RegistryReply, RegistryError> {
        match command {
            RegistryCommand::Select(role) => {
                let selected = self.select(role, store.iter())?;
                Ok(RegistryReply::Selected(selected.clone()))
            }
            RegistryCommand::SetStrategy(strategy) => {
                info!(from = %self.strategy, to = %strategy, "Load balancing strategy changed");
                self.strategy = strategy;
                Ok(RegistryReply::Strategy(strategy))
            }
            RegistryCommand::Strategy => Ok(RegistryReply::Strategy(self.strategy)),
            RegistryCommand::Health => Ok(RegistryReply::Health(HealthSnapshot {
                services: store.iter().cloned().collect(),
                load_balancing_strategy: self.strategy,
            })),
        }
    }
}
