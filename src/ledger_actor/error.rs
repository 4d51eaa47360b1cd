//! Error types for the Ledger actor.

use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Not enough unreserved stock for the request.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// A commit asked for more units than are reserved.
    #[error("Invalid reservation: requested {requested}, reserved {reserved}")]
    InvalidReservation { requested: u32, reserved: u32 },

    /// The caller's expected version is stale.
    #[error("Version conflict on {id}: expected {expected}, actual {actual}")]
    Conflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for LedgerError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => LedgerError::NotFound(id),
            other => other
                .into_entity_error::<LedgerError>()
                .unwrap_or_else(|e| LedgerError::ActorCommunicationError(e.to_string())),
        }
    }
}
