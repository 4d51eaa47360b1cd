//! Error types for the Registry actor.

use crate::model::ServiceRole;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    /// No instance with this id is registered.
    #[error("Service not found: {0}")]
    NotFound(String),

    /// Every instance of the role is down.
    #[error("{0} service unavailable")]
    Unavailable(ServiceRole),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for RegistryError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => RegistryError::NotFound(id),
            other => other
                .into_entity_error::<RegistryError>()
                .unwrap_or_else(|e| RegistryError::ActorCommunicationError(e.to_string())),
        }
    }
}
