//! # Domain Model
//!
//! Plain data types shared by the actors, clients and the request layer. Each entity
//! type also implements [`ActorEntity`](actor_framework::ActorEntity) in its actor
//! module.

pub mod order;
pub mod product;
pub mod service;

pub use order::*;
pub use product::*;
pub use service::*;

/// Errors from parsing the textual form of an identifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseIdError {
    #[error("malformed identifier: {0}")]
    Malformed(String),
    #[error("unknown service role: {0}")]
    UnknownRole(String),
}
