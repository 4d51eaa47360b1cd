use actor_framework::{ActorEntity, FrameworkError, ResourceActor, Store, StorePolicy};
use async_trait::async_trait;
use std::time::Duration;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Account {
    id: u32,
    owner: String,
    balance: i64,
    frozen: bool,
}

#[derive(Debug)]
struct AccountCreate {
    owner: String,
}

#[derive(Debug)]
struct AccountUpdate {
    owner: Option<String>,
}

#[derive(Debug)]
enum AccountAction {
    Deposit(i64),
    Interest,
}

#[derive(Debug, thiserror::Error)]
enum AccountError {
    #[error("account frozen")]
    Frozen,
    #[error("no accounts")]
    Empty,
}

#[async_trait]
impl ActorEntity for Account {
    type Id = u32;
    type Create = AccountCreate;
    type Update = AccountUpdate;
    type Action = AccountAction;
    type ActionResult = i64;
    type Context = ();
    type Error = AccountError;

    fn assign_id(seq: u32, _: &AccountCreate) -> u32 {
        seq
    }

    fn from_create_params(id: u32, params: AccountCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            owner: params.owner,
            balance: 0,
            frozen: false,
        })
    }

    async fn on_update(&mut self, update: AccountUpdate, _: &()) -> Result<(), Self::Error> {
        if let Some(owner) = update.owner {
            self.owner = owner;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: AccountAction, _: &()) -> Result<i64, Self::Error> {
        if self.frozen {
            return Err(AccountError::Frozen);
        }
        match action {
            AccountAction::Deposit(amount) => self.balance += amount,
            AccountAction::Interest => self.balance += 1,
        }
        Ok(self.balance)
    }
}

// --- Store policy: freeze the richest account ---

#[derive(Debug, Default)]
struct Auditor {
    audits: u32,
}

#[derive(Debug)]
enum AuditCommand {
    FreezeRichest,
}

impl StorePolicy<Account> for Auditor {
    type Command = AuditCommand;
    type Reply = u32;

    fn handle_command(
        &mut self,
        command: AuditCommand,
        store: &mut Store<Account>,
        _ctx: &(),
    ) -> Result<u32, AccountError> {
        match command {
            AuditCommand::FreezeRichest => {
                self.audits += 1;
                let richest = store
                    .iter()
                    .max_by_key(|a| a.balance)
                    .map(|a| a.id)
                    .ok_or(AccountError::Empty)?;
                if let Some(account) = store.get_mut(&richest) {
                    account.frozen = true;
                }
                Ok(richest)
            }
        }
    }
}

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    let id = client
        .create(AccountCreate {
            owner: "Alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);

    let balance = client
        .perform_action(id, AccountAction::Deposit(40))
        .await
        .unwrap();
    assert_eq!(balance, 40);

    let updated = client
        .update(
            id,
            AccountUpdate {
                owner: Some("Bob".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.owner, "Bob");

    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
    assert!(matches!(
        client.perform_action(id, AccountAction::Interest).await,
        Err(FrameworkError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_seeded_entities_list_in_creation_order() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    let seed = ["carol", "dave", "erin"].map(|owner| AccountCreate {
        owner: owner.to_string(),
    });
    tokio::spawn(actor.with_seed(seed).run(()));

    let owners: Vec<String> = client
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.owner)
        .collect();
    assert_eq!(owners, vec!["carol", "dave", "erin"]);
}

#[tokio::test]
async fn test_policy_command_sees_whole_store() {
    let (actor, client) = ResourceActor::with_policy(10, Auditor::default());
    let seed = ["a", "b"].map(|owner| AccountCreate {
        owner: owner.to_string(),
    });
    tokio::spawn(actor.with_seed(seed).run(()));

    client
        .perform_action(2, AccountAction::Deposit(100))
        .await
        .unwrap();

    let frozen = client.command(AuditCommand::FreezeRichest).await.unwrap();
    assert_eq!(frozen, 2);

    // The entity error comes back typed.
    let err = client
        .perform_action(2, AccountAction::Deposit(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err.into_entity_error::<AccountError>(),
        Ok(AccountError::Frozen)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_deferred_actions_apply_after_delay() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    tokio::spawn(
        actor
            .with_seed([AccountCreate { owner: "f".into() }])
            .run(()),
    );

    client
        .defer(1, AccountAction::Deposit(5), Duration::from_millis(500))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(499)).await;
    assert_eq!(client.get(1).await.unwrap().unwrap().balance, 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(client.get(1).await.unwrap().unwrap().balance, 5);
}

#[tokio::test(start_paused = true)]
async fn test_tick_reaches_every_entity() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    let seed = ["g", "h"].map(|owner| AccountCreate {
        owner: owner.to_string(),
    });
    tokio::spawn(
        actor
            .with_seed(seed)
            .with_tick(Duration::from_secs(1), || AccountAction::Interest)
            .run(()),
    );

    tokio::time::sleep(Duration::from_millis(3500)).await;
    let balances: Vec<i64> = client
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.balance)
        .collect();
    assert_eq!(balances, vec![3, 3]);
}

#[tokio::test(start_paused = true)]
async fn test_zero_tick_period_keeps_the_actor_alive() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    let seed = [AccountCreate {
        owner: "z".to_string(),
    }];
    tokio::spawn(
        actor
            .with_seed(seed)
            .with_tick(Duration::ZERO, || AccountAction::Interest)
            .run(()),
    );

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(client.get(1).await.unwrap().unwrap().balance, 0);
}
