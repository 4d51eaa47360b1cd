//! # Storefront Simulation Demo
//!
//! Boots the full system, places a handful of orders, exercises the admin actions, then
//! logs the orders, inventory and health snapshots once everything has settled.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use actor_framework::telemetry::setup_tracing;
use serde::Serialize;
use storefront_sim::config::SimulationConfig;
use storefront_sim::gateway::{AdminAction, Gateway, PlaceOrder};
use storefront_sim::lifecycle::StorefrontSystem;
use storefront_sim::model::{
    ConsistencyMode, LoadBalancingStrategy, Priority, ProductId, ServiceRole,
};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = SimulationConfig::from_env().map_err(|e| e.to_string())?;
    info!("Starting storefront simulation");

    let system = StorefrontSystem::new(config.clone());
    let gateway = system.gateway.clone();

    let span = tracing::info_span!("order_placement");
    async {
        place(&gateway, "user-1", 1, 1, Priority::Standard).await;
        place(&gateway, "user-2", 2, 3, Priority::Expedited).await;
        place(&gateway, "user-3", 3, 2, Priority::Standard).await;
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("admin");
    async {
        let outcome = gateway
            .admin(AdminAction::SetLoadBalancing {
                strategy: LoadBalancingStrategy::LeastLoad,
            })
            .await;
        info!(success = outcome.success, "Switched to least-load");

        // With every payment instance down, orders are placed but their payment declines.
        for ordinal in 1..=config.instances_per_role {
            let service_id = format!("{}-{}", ServiceRole::Payment, ordinal);
            gateway
                .admin_json(&format!(
                    r#"{{"action":"injectFault","serviceId":"{}","faultInjected":true}}"#,
                    service_id
                ))
                .await;
        }
        place(&gateway, "user-4", 4, 1, Priority::Expedited).await;
        for ordinal in 1..=config.instances_per_role {
            let service_id = format!("{}-{}", ServiceRole::Payment, ordinal);
            gateway
                .admin_json(&format!(
                    r#"{{"action":"injectFault","serviceId":"{}","faultInjected":false}}"#,
                    service_id
                ))
                .await;
        }

        gateway
            .admin(AdminAction::SetConsistency {
                mode: ConsistencyMode::Eventual,
            })
            .await;
        place(&gateway, "user-5", 5, 10, Priority::Standard).await;
        if let Ok(inventory) = gateway.inventory().await {
            let hub = inventory.data.products.iter().find(|p| p.id == ProductId(5));
            info!(reserved = ?hub.map(|p| p.reserved), "USB-C Hub before the eventual delay");
        }
    }
    .instrument(span)
    .await;

    // Enough for the slowest lane plus payment to settle.
    let settle = config.latency(Priority::Standard) * 3 + config.payment_latency();
    info!(?settle, "Waiting for orders to settle");
    tokio::time::sleep(settle).await;

    match gateway.orders().await {
        Ok(orders) => log_json("Orders", &orders),
        Err(e) => error!(error = %e, "Failed to read orders"),
    }
    match gateway.inventory().await {
        Ok(inventory) => log_json("Inventory", &inventory),
        Err(e) => error!(error = %e, "Failed to read inventory"),
    }
    match gateway.health().await {
        Ok(health) => log_json("Health", &health),
        Err(e) => error!(error = %e, "Failed to read health"),
    }

    drop(gateway);
    system.shutdown().await?;

    info!("Simulation completed successfully");
    Ok(())
}

async fn place(gateway: &Gateway, user: &str, product: u32, quantity: u32, priority: Priority) {
    let request = PlaceOrder {
        user_id: user.to_string(),
        product_id: ProductId(product),
        quantity,
        priority,
    };
    match gateway.place_order(request).await {
        Ok(receipt) => info!(
            order_id = %receipt.order.id,
            service = %receipt.service_id,
            paid = receipt.payment.success,
            "Order placed"
        ),
        Err(e) => warn!(error = %e, "Order rejected"),
    }
}

fn log_json<T: Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => info!("{}:\n{}", label, json),
        Err(e) => error!(error = %e, "Failed to serialize {}", label),
    }
}
