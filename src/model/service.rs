//! Service instances tracked by the registry.
//!
//! # Actor Framework
//! [`ServiceInstance`] implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
//!
//! See [`impl ActorEntity for ServiceInstance`](#impl-ActorEntity-for-ServiceInstance)
//! for details on:
//! - Creation parameters ([`ServiceCreate`])
//! - Update parameters ([`ServiceUpdate`])
//! - Custom actions ([`RegistryAction`](crate::registry_actor::RegistryAction))

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::ParseIdError;

/// The fixed set of service roles in the simulated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    Gateway,
    Auth,
    Inventory,
    Order,
    Payment,
}

impl ServiceRole {
    /// Every role, in registration order.
    pub const ALL: [ServiceRole; 5] = [
        ServiceRole::Gateway,
        ServiceRole::Auth,
        ServiceRole::Inventory,
        ServiceRole::Order,
        ServiceRole::Payment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRole::Gateway => "gateway",
            ServiceRole::Auth => "auth",
            ServiceRole::Inventory => "inventory",
            ServiceRole::Order => "order",
            ServiceRole::Payment => "payment",
        }
    }
}

impl Display for ServiceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceRole {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseIdError::UnknownRole(s.to_string()))
    }
}

/// Type-safe identifier for service instances, rendered as `<role>-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstanceId {
    pub role: ServiceRole,
    pub ordinal: u32,
}

impl InstanceId {
    pub fn new(role: ServiceRole, ordinal: u32) -> Self {
        Self { role, ordinal }
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.role, self.ordinal)
    }
}

impl FromStr for InstanceId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, ordinal) = s
            .rsplit_once('-')
            .ok_or_else(|| ParseIdError::Malformed(s.to_string()))?;
        let ordinal = ordinal
            .parse()
            .map_err(|_| ParseIdError::Malformed(s.to_string()))?;
        Ok(Self::new(role.parse()?, ordinal))
    }
}

impl TryFrom<String> for InstanceId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InstanceId> for String {
    fn from(id: InstanceId) -> Self {
        id.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    /// Part of the reporting vocabulary; nothing in the simulation derives it.
    Degraded,
    Down,
}

/// How `Select(role)` picks among the live instances of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadBalancingStrategy {
    #[default]
    RoundRobin,
    LeastLoad,
}

impl Display for LoadBalancingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadBalancingStrategy::RoundRobin => f.write_str("round-robin"),
            LoadBalancingStrategy::LeastLoad => f.write_str("least-load"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    pub id: InstanceId,
    #[serde(rename = "type")]
    pub role: ServiceRole,
    pub status: ServiceStatus,
    /// Always within `[0, 100]`.
    pub load: f64,
    pub request_count: u64,
    pub error_count: u64,
    pub last_health_check: DateTime<Utc>,
    pub fault_injected: bool,
}

impl ServiceInstance {
    pub const MAX_LOAD: f64 = 100.0;

    /// A healthy, idle instance.
    pub fn new(id: InstanceId) -> Self {
        Self {
            id,
            role: id.role,
            status: ServiceStatus::Healthy,
            load: 0.0,
            request_count: 0,
            error_count: 0,
            last_health_check: Utc::now(),
            fault_injected: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status != ServiceStatus::Down
    }

    /// Sets the load, clamped to `[0, 100]`.
    pub fn set_load(&mut self, load: f64) {
        self.load = if load.is_nan() {
            0.0
        } else {
            load.clamp(0.0, Self::MAX_LOAD)
        };
    }

    /// Forces the instance down, or restores it to healthy.
    pub fn set_fault(&mut self, enabled: bool) {
        self.fault_injected = enabled;
        self.status = if enabled {
            ServiceStatus::Down
        } else {
            ServiceStatus::Healthy
        };
        self.last_health_check = Utc::now();
    }
}

/// Payload for registering an instance. The ordinal is part of the identity.
#[derive(Debug, Clone)]
pub struct ServiceCreate {
    pub role: ServiceRole,
    pub ordinal: u32,
}

/// Operator override of an instance's load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub load: Option<f64>,
}

/// Full instance list plus the active strategy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub services: Vec<ServiceInstance>,
    pub load_balancing_strategy: LoadBalancingStrategy,
}
