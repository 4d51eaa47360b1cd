//! # Domain Clients
//!
//! Type-safe wrappers around the generic `ResourceClient`, one per actor. Each
//! implements [`ActorClient`](actor_framework::ActorClient) for `get` and `list`, maps
//! framework failures to the actor's own error type, and adds the actor's operations.

pub mod ledger_client;
pub mod pipeline_client;
pub mod registry_client;

pub use ledger_client::LedgerClient;
pub use pipeline_client::PipelineClient;
pub use registry_client::RegistryClient;
