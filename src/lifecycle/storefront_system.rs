use crate::config::SimulationConfig;
use crate::gateway::{settlement, Gateway};
use crate::registry_actor::RegistryTuning;
use crate::{ledger_actor, pipeline_actor, registry_actor};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running storefront.
///
/// Owns the task handles of every actor and worker, and hands out the [`Gateway`]
/// through which all requests flow. Must be built inside a Tokio runtime.
///
/// # Example
///
/// ```rust,ignore
/// let system = StorefrontSystem::new(SimulationConfig::default());
///
/// let receipt = system.gateway.place_order(request).await?;
/// let health = system.gateway.health().await?;
///
/// system.shutdown().await?;
/// ```
pub struct StorefrontSystem {
    pub gateway: Gateway,
    shutdown: watch::Sender<bool>,
    /// The pipeline drain loop.
    drain: JoinHandle<()>,
    settlement: JoinHandle<()>,
    actors: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Seeds and spawns the registry, ledger and pipeline actors, the drain loop and
    /// the settlement worker.
    pub fn new(config: SimulationConfig) -> Self {
        info!(?config, "Starting storefront");

        // 1. Create actors and clients
        let (registry, registry_client) = registry_actor::new(&config);
        let (ledger, ledger_client) = ledger_actor::new(&config);
        let (pipeline, pipeline_client, worker) = pipeline_actor::new(&config);

        // 2. Start actors, injecting the registry's tuning
        let actors = vec![
            tokio::spawn(registry.run(RegistryTuning::from(&config))),
            tokio::spawn(ledger.run(())),
            tokio::spawn(pipeline.run(())),
        ];

        // 3. Start workers
        let (shutdown, shutdown_rx) = watch::channel(false);
        let drain = tokio::spawn(worker.run(shutdown_rx));

        let (settlements, settlement_worker) =
            settlement::channel(64, ledger_client.clone(), pipeline_client.clone());
        let settlement = tokio::spawn(settlement_worker.run());

        let gateway = Gateway::new(
            registry_client,
            ledger_client,
            pipeline_client,
            settlements,
            &config,
        );

        Self {
            gateway,
            shutdown,
            drain,
            settlement,
            actors,
        }
    }

    /// Stops the workers, waits for scheduled settlements, then stops every actor.
    ///
    /// Returns an error if any task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront...");

        // Stop the drain loop first; it holds a pipeline client.
        let _ = self.shutdown.send(true);
        join("drain loop", self.drain).await?;

        // Closing the settlement queue lets the worker drain and exit.
        drop(self.gateway);
        join("settlement worker", self.settlement).await?;

        for handle in self.actors {
            join("actor", handle).await?;
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}

async fn join(task: &str, handle: JoinHandle<()>) -> Result<(), String> {
    handle.await.map_err(|e| {
        error!(task, "Task failed: {:?}", e);
        format!("{} task failed: {:?}", task, e)
    })
}
