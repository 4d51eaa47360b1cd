//! Errors surfaced by the request layer.

use crate::ledger_actor::LedgerError;
use crate::model::ServiceRole;
use crate::pipeline_actor::PipelineError;
use crate::registry_actor::RegistryError;
use thiserror::Error;

/// Every way a gateway request can fail.
///
/// `Unavailable` is pulled out of [`RegistryError`] so callers can treat it as the
/// hard service-unavailable condition without matching through the registry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("{0} service unavailable")]
    Unavailable(ServiceRole),

    #[error(transparent)]
    Registry(RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Settlement worker stopped")]
    SettlementClosed,
}

impl From<RegistryError> for GatewayError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Unavailable(role) => GatewayError::Unavailable(role),
            other => GatewayError::Registry(other),
        }
    }
}

impl GatewayError {
    /// A rejection of the request itself, such as an unknown product or short stock.
    /// The instance that served it is healthy and is not charged an error.
    pub fn is_rejection(&self) -> bool {
        match self {
            GatewayError::Ledger(e) => !matches!(e, LedgerError::ActorCommunicationError(_)),
            GatewayError::Pipeline(e) => !matches!(e, PipelineError::ActorCommunicationError(_)),
            GatewayError::Unavailable(_)
            | GatewayError::Registry(_)
            | GatewayError::SettlementClosed => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rejections_are_not_instance_faults() {
        assert!(GatewayError::from(LedgerError::NotFound("prod-9".into())).is_rejection());
        assert!(GatewayError::from(LedgerError::InsufficientStock {
            requested: 2,
            available: 1
        })
        .is_rejection());
        assert!(!GatewayError::from(LedgerError::ActorCommunicationError("gone".into()))
            .is_rejection());
        assert!(!GatewayError::Unavailable(ServiceRole::Order).is_rejection());
        assert!(!GatewayError::SettlementClosed.is_rejection());
    }
}
