//! Error types for the Pipeline actor.

use crate::model::OrderId;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during pipeline operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The drain loop asked for work while an order is still in flight.
    #[error("Order {0} is still in flight")]
    Busy(OrderId),

    /// A result was reported for an order the drain loop does not hold.
    #[error("Order {0} is not in flight")]
    NotInFlight(OrderId),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for PipelineError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => PipelineError::NotFound(id),
            other => other
                .into_entity_error::<PipelineError>()
                .unwrap_or_else(|e| PipelineError::ActorCommunicationError(e.to_string())),
        }
    }
}
