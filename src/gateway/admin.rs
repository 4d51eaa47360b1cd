//! Operator actions, in their JSON wire form.
//!
//! ```json
//! { "action": "setLoadBalancing", "loadBalancingStrategy": "least-load" }
//! { "action": "injectFault", "serviceId": "payment-1", "faultInjected": true }
//! { "action": "setConsistency", "consistencyMode": "eventual" }
//! ```

use crate::model::{ConsistencyMode, InstanceId, LoadBalancingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AdminAction {
    SetLoadBalancing {
        #[serde(rename = "loadBalancingStrategy")]
        strategy: LoadBalancingStrategy,
    },
    InjectFault {
        #[serde(rename = "serviceId")]
        service_id: InstanceId,
        #[serde(rename = "faultInjected")]
        enabled: bool,
    },
    SetConsistency {
        #[serde(rename = "consistencyMode")]
        mode: ConsistencyMode,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdminOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_parse_from_wire_names() {
        let action: AdminAction = serde_json::from_str(
            r#"{"action":"injectFault","serviceId":"payment-2","faultInjected":true}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            AdminAction::InjectFault {
                service_id: "payment-2".parse().unwrap(),
                enabled: true,
            }
        );

        let action: AdminAction = serde_json::from_str(
            r#"{"action":"setLoadBalancing","loadBalancingStrategy":"least-load"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            AdminAction::SetLoadBalancing {
                strategy: LoadBalancingStrategy::LeastLoad
            }
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(serde_json::from_str::<AdminAction>(r#"{"action":"reboot"}"#).is_err());
        assert!(serde_json::from_str::<AdminAction>(
            r#"{"action":"setConsistency","consistencyMode":"linearizable"}"#
        )
        .is_err());
    }

    #[test]
    fn outcome_omits_absent_error() {
        assert_eq!(
            serde_json::to_string(&AdminOutcome::ok()).unwrap(),
            r#"{"success":true}"#
        );
    }
}
