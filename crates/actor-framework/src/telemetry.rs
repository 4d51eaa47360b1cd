//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the compact `tracing-subscriber` formatter used by every
//! binary in the workspace. Verbosity comes from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle, creations, selections
//! RUST_LOG=debug cargo run     # every request with its payload
//! RUST_LOG=actor_framework=debug,storefront_sim=info cargo run
//! ```
//!
//! Actors log with an `entity_type` field (e.g. `entity_type="Order"`), so module
//! paths are hidden (`with_target(false)`).
//!
//! With `RUST_LOG=debug` a single order placement reads like:
//!
//! ```text
//! DEBUG Command entity_type="ServiceInstance" command=Select(Order)
//! DEBUG Action entity_type="ServiceInstance" id=order-1 action=RecordRequest
//! DEBUG Command entity_type="Product" command=Reserve { id: ProductId(1), quantity: 2, expected_version: None }
//! DEBUG Command entity_type="Order" command=Submit(OrderCreate { .. })
//! INFO  Order queued id=order-1 priority=Standard size=1
//! DEBUG Defer entity_type="ServiceInstance" id=order-1 action=ReleaseLoad after=100ms
//! ```

/// Initializes the global subscriber. Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
