//! # Ledger Client
//!
//! High-level API for the Ledger actor. Wraps a `ResourceClient<Product, LedgerPolicy>`
//! and returns [`LedgerError`] for every failure, with the ledger's own error variants
//! recovered from the framework error.
use crate::ledger_actor::{LedgerAction, LedgerCommand, LedgerError, LedgerPolicy, LedgerReply};
use crate::model::{ConsistencyMode, InventorySnapshot, Product, ProductId};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for interacting with the Ledger actor.
#[derive(Clone)]
pub struct LedgerClient {
    inner: ResourceClient<Product, LedgerPolicy>,
}

impl LedgerClient {
    pub fn new(inner: ResourceClient<Product, LedgerPolicy>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product, LedgerPolicy> for LedgerClient {
    type Error = LedgerError;

    fn inner(&self) -> &ResourceClient<Product, LedgerPolicy> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        LedgerError::from(e)
    }
}

impl LedgerClient {
    async fn action(&self, id: ProductId, action: LedgerAction) -> Result<Product, LedgerError> {
        Ok(self.inner.perform_action(id, action).await?)
    }

    async fn command(&self, command: LedgerCommand) -> Result<LedgerReply, LedgerError> {
        Ok(self.inner.command(command).await?)
    }

    /// Holds `quantity` units. In eventual mode the hold lands after the eventual delay
    /// and the returned product predates it.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn reserve(&self, id: ProductId, quantity: u32) -> Result<Product, LedgerError> {
        self.reserve_versioned(id, quantity, None).await
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn reserve_versioned(
        &self,
        id: ProductId,
        quantity: u32,
        expected_version: Option<u64>,
    ) -> Result<Product, LedgerError> {
        debug!("Reserving stock");
        match self
            .command(LedgerCommand::Reserve {
                id,
                quantity,
                expected_version,
            })
            .await?
        {
            LedgerReply::Reserved { product, .. } => Ok(product),
            _ => unreachable!("Reserve command must return Reserved reply"),
        }
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn commit(&self, id: ProductId, quantity: u32) -> Result<Product, LedgerError> {
        self.commit_versioned(id, quantity, None).await
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn commit_versioned(
        &self,
        id: ProductId,
        quantity: u32,
        expected_version: Option<u64>,
    ) -> Result<Product, LedgerError> {
        self.action(
            id,
            LedgerAction::Commit {
                quantity,
                expected_version,
            },
        )
        .await
    }

    /// Clamps at zero. An unknown product is ignored and yields `None`; only a dead
    /// actor fails.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn release(
        &self,
        id: ProductId,
        quantity: u32,
    ) -> Result<Option<Product>, LedgerError> {
        match self.action(id, LedgerAction::Release(quantity)).await {
            Ok(product) => Ok(Some(product)),
            Err(LedgerError::NotFound(_)) => {
                warn!(%id, quantity, "Release for unknown product ignored");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn replenish(&self, id: ProductId, quantity: u32) -> Result<Product, LedgerError> {
        self.replenish_versioned(id, quantity, None).await
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn replenish_versioned(
        &self,
        id: ProductId,
        quantity: u32,
        expected_version: Option<u64>,
    ) -> Result<Product, LedgerError> {
        self.action(
            id,
            LedgerAction::Replenish {
                quantity,
                expected_version,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_mode(&self, mode: ConsistencyMode) -> Result<(), LedgerError> {
        self.command(LedgerCommand::SetMode(mode)).await?;
        Ok(())
    }

    pub async fn mode(&self) -> Result<ConsistencyMode, LedgerError> {
        match self.command(LedgerCommand::Mode).await? {
            LedgerReply::Mode(mode) => Ok(mode),
            _ => unreachable!("Mode command must return Mode reply"),
        }
    }

    /// Affects reservations made afterwards.
    #[instrument(skip(self))]
    pub async fn set_eventual_delay(&self, delay: Duration) -> Result<(), LedgerError> {
        self.command(LedgerCommand::SetEventualDelay(delay)).await?;
        Ok(())
    }

    /// Full product list plus the active mode.
    pub async fn snapshot(&self) -> Result<InventorySnapshot, LedgerError> {
        match self.command(LedgerCommand::Snapshot).await? {
            LedgerReply::Snapshot(snapshot) => Ok(snapshot),
            _ => unreachable!("Snapshot command must return Snapshot reply"),
        }
    }
}
