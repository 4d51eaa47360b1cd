//! # Simulation Configuration
//!
//! Every timing and probability knob of the simulation, with defaults that reproduce
//! the storefront's behavior. Missing JSON fields fall back to those defaults:
//!
//! ```rust
//! use storefront_sim::config::SimulationConfig;
//! use storefront_sim::model::ConsistencyMode;
//!
//! let config = SimulationConfig::from_json(r#"{ "consistencyMode": "eventual" }"#).unwrap();
//! assert_eq!(config.consistency_mode, ConsistencyMode::Eventual);
//! assert_eq!(config.eventual_delay_ms, 2000);
//! ```

use crate::model::{ConsistencyMode, LoadBalancingStrategy, Priority};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming a JSON config file for the demo binary.
pub const CONFIG_ENV: &str = "STOREFRONT_CONFIG";

/// Longest accepted timing, one day.
pub const MAX_DURATION_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },
    #[error("{field} must be at most {MAX_DURATION_MS}ms, got {value}")]
    Duration { field: &'static str, value: u64 },
    #[error("decayPeriodMs must be non-zero")]
    ZeroDecayPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    pub instances_per_role: u32,
    pub load_balancing_strategy: LoadBalancingStrategy,
    pub consistency_mode: ConsistencyMode,
    pub eventual_delay_ms: u64,
    pub expedited_latency_ms: u64,
    pub standard_latency_ms: u64,
    pub pipeline_failure_probability: f64,
    /// Upper bound of the random load added per request.
    pub request_load_max: f64,
    /// Upper bound of the random load removed when a request completes.
    pub release_load_max: f64,
    pub decay_step: f64,
    pub decay_period_ms: u64,
    pub lease_release_delay_ms: u64,
    pub payment_latency_ms: u64,
    pub payment_decline_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            instances_per_role: 2,
            load_balancing_strategy: LoadBalancingStrategy::RoundRobin,
            consistency_mode: ConsistencyMode::Strong,
            eventual_delay_ms: 2000,
            expedited_latency_ms: 1000,
            standard_latency_ms: 2000,
            pipeline_failure_probability: 0.05,
            request_load_max: 5.0,
            release_load_max: 3.0,
            decay_step: 0.5,
            decay_period_ms: 1000,
            lease_release_delay_ms: 100,
            payment_latency_ms: 500,
            payment_decline_probability: 0.05,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Loads the file named by `STOREFRONT_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pipelineFailureProbability", self.pipeline_failure_probability),
            ("paymentDeclineProbability", self.payment_decline_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }
        for (field, value) in [
            ("eventualDelayMs", self.eventual_delay_ms),
            ("expeditedLatencyMs", self.expedited_latency_ms),
            ("standardLatencyMs", self.standard_latency_ms),
            ("decayPeriodMs", self.decay_period_ms),
            ("leaseReleaseDelayMs", self.lease_release_delay_ms),
            ("paymentLatencyMs", self.payment_latency_ms),
        ] {
            if value > MAX_DURATION_MS {
                return Err(ConfigError::Duration { field, value });
            }
        }
        if self.decay_period_ms == 0 {
            return Err(ConfigError::ZeroDecayPeriod);
        }
        Ok(())
    }

    pub fn eventual_delay(&self) -> Duration {
        Duration::from_millis(self.eventual_delay_ms)
    }

    /// Simulated fulfillment time for the lane.
    pub fn latency(&self, priority: Priority) -> Duration {
        match priority {
            Priority::Expedited => Duration::from_millis(self.expedited_latency_ms),
            Priority::Standard => Duration::from_millis(self.standard_latency_ms),
        }
    }

    pub fn decay_period(&self) -> Duration {
        Duration::from_millis(self.decay_period_ms)
    }

    pub fn lease_release_delay(&self) -> Duration {
        Duration::from_millis(self.lease_release_delay_ms)
    }

    pub fn payment_latency(&self) -> Duration {
        Duration::from_millis(self.payment_latency_ms)
    }
}
