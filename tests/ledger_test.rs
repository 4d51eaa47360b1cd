use actor_framework::ActorClient;
use proptest::prelude::*;
use std::time::Duration;
use storefront_sim::clients::LedgerClient;
use storefront_sim::config::SimulationConfig;
use storefront_sim::ledger_actor::{self, LedgerError};
use storefront_sim::model::{ConsistencyMode, Product, ProductId};

/// Laptop Pro: stock 50, price 1299.
const LAPTOP: ProductId = ProductId(1);

fn spawn(config: &SimulationConfig) -> LedgerClient {
    let (actor, client) = ledger_actor::new(config);
    tokio::spawn(actor.run(()));
    client
}

async fn laptop(ledger: &LedgerClient) -> Product {
    ledger.get(LAPTOP).await.unwrap().unwrap()
}

#[tokio::test]
async fn catalog_is_seeded() {
    let ledger = spawn(&SimulationConfig::default());

    let snapshot = ledger.snapshot().await.unwrap();
    assert_eq!(snapshot.consistency_mode, ConsistencyMode::Strong);
    let names: Vec<_> = snapshot.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Laptop Pro",
            "Wireless Mouse",
            "Mechanical Keyboard",
            "4K Monitor",
            "USB-C Hub"
        ]
    );
    assert!(snapshot
        .products
        .iter()
        .all(|p| p.reserved == 0 && p.version == 1));
}

#[tokio::test]
async fn reserve_then_commit() {
    let ledger = spawn(&SimulationConfig::default());

    let reserved = ledger.reserve(LAPTOP, 10).await.unwrap();
    assert_eq!((reserved.stock, reserved.reserved), (50, 10));

    let committed = ledger.commit(LAPTOP, 10).await.unwrap();
    assert_eq!((committed.stock, committed.reserved), (40, 0));
}

#[tokio::test]
async fn over_reservation_is_rejected_without_change() {
    let ledger = spawn(&SimulationConfig::default());

    let err = ledger.reserve(LAPTOP, 60).await.unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientStock {
            requested: 60,
            available: 50
        }
    );

    let product = laptop(&ledger).await;
    assert_eq!((product.stock, product.reserved, product.version), (50, 0, 1));
}

#[tokio::test]
async fn commit_beyond_reserved_is_invalid() {
    let ledger = spawn(&SimulationConfig::default());
    ledger.reserve(LAPTOP, 3).await.unwrap();
    let before = laptop(&ledger).await;

    let err = ledger.commit(LAPTOP, 4).await.unwrap_err();
    assert_eq!(
        err,
        LedgerError::InvalidReservation {
            requested: 4,
            reserved: 3
        }
    );
    assert_eq!(laptop(&ledger).await, before);
}

#[tokio::test]
async fn release_clamps_and_is_repeatable() {
    let ledger = spawn(&SimulationConfig::default());
    ledger.reserve(LAPTOP, 5).await.unwrap();

    for _ in 0..2 {
        let released = ledger.release(LAPTOP, 8).await.unwrap().unwrap();
        assert_eq!(released.reserved, 0);
    }
    assert_eq!(laptop(&ledger).await.stock, 50);
}

#[tokio::test]
async fn stale_version_conflicts() {
    let ledger = spawn(&SimulationConfig::default());
    ledger.replenish(LAPTOP, 5).await.unwrap();

    let err = ledger
        .reserve_versioned(LAPTOP, 1, Some(1))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::Conflict {
            id: "prod-1".into(),
            expected: 1,
            actual: 2
        }
    );

    let product = ledger.reserve_versioned(LAPTOP, 1, Some(2)).await.unwrap();
    assert_eq!((product.stock, product.reserved, product.version), (55, 1, 3));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let ledger = spawn(&SimulationConfig::default());

    assert_eq!(
        ledger.reserve(ProductId(42), 1).await.unwrap_err(),
        LedgerError::NotFound("prod-42".into())
    );
}

#[tokio::test]
async fn releasing_an_unknown_product_is_ignored() {
    let ledger = spawn(&SimulationConfig::default());

    assert_eq!(ledger.release(ProductId(42), 1).await.unwrap(), None);
    assert_eq!(ledger.snapshot().await.unwrap().products.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn eventual_reservation_lands_after_the_delay() {
    let config = SimulationConfig {
        consistency_mode: ConsistencyMode::Eventual,
        ..Default::default()
    };
    let ledger = spawn(&config);

    ledger.reserve(LAPTOP, 5).await.unwrap();
    assert_eq!(laptop(&ledger).await.reserved, 0);

    tokio::time::sleep(config.eventual_delay() - Duration::from_millis(1)).await;
    assert_eq!(laptop(&ledger).await.reserved, 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(laptop(&ledger).await.reserved, 5);
}

#[tokio::test(start_paused = true)]
async fn eventual_mode_can_oversell_inside_the_window() {
    let ledger = spawn(&SimulationConfig::default());
    ledger.set_mode(ConsistencyMode::Eventual).await.unwrap();
    ledger
        .set_eventual_delay(Duration::from_millis(500))
        .await
        .unwrap();

    // Both checks see reserved = 0.
    ledger.reserve(LAPTOP, 40).await.unwrap();
    ledger.reserve(LAPTOP, 40).await.unwrap();

    tokio::time::sleep(Duration::from_millis(600)).await;
    let product = laptop(&ledger).await;
    assert_eq!(product.reserved, 80);
    assert_eq!(product.available(), 0);

    // Committing the whole hold would take stock below zero.
    assert_eq!(
        ledger.commit(LAPTOP, 80).await.unwrap_err(),
        LedgerError::InsufficientStock {
            requested: 80,
            available: 50
        }
    );
}

#[tokio::test]
async fn mode_switch_is_reported() {
    let ledger = spawn(&SimulationConfig::default());

    ledger.set_mode(ConsistencyMode::Eventual).await.unwrap();
    assert_eq!(ledger.mode().await.unwrap(), ConsistencyMode::Eventual);

    let json = serde_json::to_value(ledger.snapshot().await.unwrap()).unwrap();
    assert_eq!(json["consistencyMode"], "eventual");
    assert_eq!(json["products"][0]["id"], "prod-1");
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Reserve(u32),
    Commit(u32),
    Release(u32),
    Replenish(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..30).prop_map(Op::Reserve),
        (0u32..30).prop_map(Op::Commit),
        (0u32..30).prop_map(Op::Release),
        (0u32..10).prop_map(Op::Replenish),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn strong_mode_keeps_reserved_within_stock(ops in prop::collection::vec(op(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let ledger = spawn(&SimulationConfig::default());
            for op in ops {
                // Rejections are fine; only the invariant matters.
                let _ = match op {
                    Op::Reserve(q) => ledger.reserve(LAPTOP, q).await.map(Some),
                    Op::Commit(q) => ledger.commit(LAPTOP, q).await.map(Some),
                    Op::Release(q) => ledger.release(LAPTOP, q).await,
                    Op::Replenish(q) => ledger.replenish(LAPTOP, q).await.map(Some),
                };
                let product = laptop(&ledger).await;
                assert!(
                    product.reserved <= product.stock,
                    "reserved {} > stock {} after {:?}",
                    product.reserved,
                    product.stock,
                    op
                );
            }
        });
    }
}
