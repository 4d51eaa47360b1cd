use actor_framework::ActorClient;
use std::collections::HashSet;
use std::time::Duration;
use storefront_sim::clients::RegistryClient;
use storefront_sim::config::SimulationConfig;
use storefront_sim::model::{InstanceId, LoadBalancingStrategy, ServiceRole, ServiceStatus};
use storefront_sim::registry_actor::{self, RegistryError, RegistryTuning};

fn spawn(config: SimulationConfig) -> RegistryClient {
    let (actor, client) = registry_actor::new(&config);
    tokio::spawn(actor.run(RegistryTuning::from(&config)));
    client
}

fn id(s: &str) -> InstanceId {
    s.parse().unwrap()
}

#[tokio::test]
async fn round_robin_visits_every_instance_once_per_cycle() {
    let registry = spawn(SimulationConfig {
        instances_per_role: 3,
        ..Default::default()
    });

    let mut seen = HashSet::new();
    for _ in 0..3 {
        seen.insert(registry.select(ServiceRole::Order).await.unwrap().id);
    }
    let expected: HashSet<_> = ["order-1", "order-2", "order-3"].map(id).into();
    assert_eq!(seen, expected);

    // The next cycle starts over in the same order.
    assert_eq!(
        registry.select(ServiceRole::Order).await.unwrap().id,
        id("order-1")
    );
}

#[tokio::test]
async fn round_robin_counters_are_per_role() {
    let registry = spawn(SimulationConfig::default());

    assert_eq!(registry.select(ServiceRole::Order).await.unwrap().id, id("order-1"));
    assert_eq!(registry.select(ServiceRole::Auth).await.unwrap().id, id("auth-1"));
    assert_eq!(registry.select(ServiceRole::Order).await.unwrap().id, id("order-2"));
}

#[tokio::test]
async fn least_load_picks_the_lightest_live_instance() {
    let registry = spawn(SimulationConfig {
        instances_per_role: 3,
        load_balancing_strategy: LoadBalancingStrategy::LeastLoad,
        ..Default::default()
    });

    registry.set_load(id("inventory-1"), 40.0).await.unwrap();
    registry.set_load(id("inventory-2"), 10.0).await.unwrap();
    registry.set_load(id("inventory-3"), 25.0).await.unwrap();

    let chosen = registry.select(ServiceRole::Inventory).await.unwrap();
    assert_eq!(chosen.id, id("inventory-2"));
    for other in registry.services_by_role(ServiceRole::Inventory).await.unwrap() {
        assert!(chosen.load <= other.load);
    }

    // A faulted instance is never a candidate, however light.
    registry.inject_fault(id("inventory-2"), true).await.unwrap();
    assert_eq!(
        registry.select(ServiceRole::Inventory).await.unwrap().id,
        id("inventory-3")
    );
}

#[tokio::test]
async fn fault_injection_excludes_immediately_and_restores() {
    let registry = spawn(SimulationConfig::default());
    let before = registry.get(id("payment-1")).await.unwrap().unwrap();

    let faulted = registry.inject_fault(id("payment-1"), true).await.unwrap();
    assert_eq!(faulted.status, ServiceStatus::Down);
    assert!(faulted.fault_injected);
    assert!(faulted.last_health_check >= before.last_health_check);

    for _ in 0..4 {
        assert_eq!(
            registry.select(ServiceRole::Payment).await.unwrap().id,
            id("payment-2")
        );
    }

    registry.inject_fault(id("payment-2"), true).await.unwrap();
    assert_eq!(
        registry.select(ServiceRole::Payment).await.unwrap_err(),
        RegistryError::Unavailable(ServiceRole::Payment)
    );

    let restored = registry.inject_fault(id("payment-1"), false).await.unwrap();
    assert_eq!(restored.status, ServiceStatus::Healthy);
    assert_eq!(
        registry.select(ServiceRole::Payment).await.unwrap().id,
        id("payment-1")
    );
}

#[tokio::test]
async fn strategy_switch_applies_to_the_next_selection() {
    let registry = spawn(SimulationConfig::default());
    registry.set_load(id("auth-1"), 90.0).await.unwrap();

    assert_eq!(registry.select(ServiceRole::Auth).await.unwrap().id, id("auth-1"));

    registry
        .set_strategy(LoadBalancingStrategy::LeastLoad)
        .await
        .unwrap();
    assert_eq!(
        registry.strategy().await.unwrap(),
        LoadBalancingStrategy::LeastLoad
    );
    assert_eq!(registry.select(ServiceRole::Auth).await.unwrap().id, id("auth-2"));
}

#[tokio::test]
async fn requests_and_errors_are_counted() {
    let registry = spawn(SimulationConfig::default());

    let after = registry.record_request(id("gateway-1")).await.unwrap();
    assert_eq!(after.request_count, 1);
    assert!((0.0..5.0).contains(&after.load));

    let after = registry.record_error(id("gateway-1")).await.unwrap();
    assert_eq!(after.error_count, 1);
    assert_eq!(after.status, ServiceStatus::Healthy);
}

#[tokio::test]
async fn unknown_instance_is_not_found() {
    let registry = spawn(SimulationConfig::default());

    let err = registry.inject_fault(id("order-9"), true).await.unwrap_err();
    assert_eq!(err, RegistryError::NotFound("order-9".into()));
}

#[tokio::test(start_paused = true)]
async fn load_decays_once_per_period() {
    let registry = spawn(SimulationConfig::default());
    registry.set_load(id("order-1"), 10.0).await.unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let instance = registry.get(id("order-1")).await.unwrap().unwrap();
    assert!((instance.load - 9.0).abs() < 1e-9, "load = {}", instance.load);

    // Idle instances stay at zero.
    let idle = registry.get(id("order-2")).await.unwrap().unwrap();
    assert_eq!(idle.load, 0.0);
}

#[tokio::test(start_paused = true)]
async fn scheduled_release_lowers_load_later() {
    let config = SimulationConfig::default();
    let registry = spawn(config.clone());
    registry.set_load(id("order-1"), 50.0).await.unwrap();

    registry
        .release_load_after(id("order-1"), config.lease_release_delay())
        .await
        .unwrap();
    assert_eq!(registry.get(id("order-1")).await.unwrap().unwrap().load, 50.0);

    tokio::time::sleep(config.lease_release_delay() * 2).await;
    let load = registry.get(id("order-1")).await.unwrap().unwrap().load;
    assert!(load <= 50.0 && load > 50.0 - config.release_load_max, "load = {}", load);
}

#[tokio::test]
async fn health_snapshot_serializes_with_wire_names() {
    let registry = spawn(SimulationConfig::default());

    let health = registry.health().await.unwrap();
    assert_eq!(health.services.len(), 10);
    assert_eq!(health.load_balancing_strategy, LoadBalancingStrategy::RoundRobin);

    let json = serde_json::to_value(&health).unwrap();
    assert_eq!(json["loadBalancingStrategy"], "round-robin");
    assert_eq!(json["services"][0]["id"], "gateway-1");
    assert_eq!(json["services"][0]["type"], "gateway");
    assert_eq!(json["services"][0]["status"], "healthy");
}
