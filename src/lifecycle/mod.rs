//! # System Lifecycle & Orchestration
//!
//! Starts, wires and stops the storefront: three actors, two workers and the gateway
//! that fronts them.
//!
//! ## Wiring
//!
//! ```rust,ignore
//! let (registry, registry_client) = registry_actor::new(&config);
//! let (ledger, ledger_client) = ledger_actor::new(&config);
//! let (pipeline, pipeline_client, worker) = pipeline_actor::new(&config);
//!
//! tokio::spawn(registry.run(RegistryTuning::from(&config)));
//! tokio::spawn(ledger.run(()));
//! tokio::spawn(pipeline.run(()));
//! tokio::spawn(worker.run(shutdown_rx));
//! ```
//!
//! The registry is the only actor with a context: its load tuning is injected at
//! `run` time rather than at construction. No actor holds another actor's client, so
//! the dependency graph is acyclic and channel closure is enough to stop every actor.
//!
//! ## Graceful Shutdown
//!
//! 1. **Stop the drain loop** - flip the shutdown watch; an order mid-processing is
//!    abandoned in `processing`
//! 2. **Drop the gateway** - closes the settlement queue
//! 3. **Drain settlements** - the settlement worker finishes every job already scheduled,
//!    then exits and drops its clients
//! 4. **Drop the remaining clients** - actors see `recv()` return `None`
//! 5. **Await completion** - join every task
//!
//! Deferred actor work (eventual reservations, load releases) that has not fired when
//! its actor stops is discarded.
//!
//! ## Observability
//!
//! Call [`setup_tracing`](actor_framework::telemetry::setup_tracing) once before
//! building the system. Verbosity comes from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact logs
//! RUST_LOG=debug cargo run     # Commands, payloads and deferred work
//! ```

pub mod storefront_system;

pub use storefront_system::*;
