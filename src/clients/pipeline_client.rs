//! # Pipeline Client
//!
//! High-level API for the Pipeline actor.
use crate::model::{
    Fulfillment, Order, OrderCreate, OrderId, OrderStatus, OrderStatusUpdate, OrdersSnapshot,
    QueueStatus,
};
use crate::pipeline_actor::{PipelineCommand, PipelineError, PipelinePolicy, PipelineReply};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Pipeline actor.
#[derive(Clone)]
pub struct PipelineClient {
    inner: ResourceClient<Order, PipelinePolicy>,
}

impl PipelineClient {
    pub fn new(inner: ResourceClient<Order, PipelinePolicy>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order, PipelinePolicy> for PipelineClient {
    type Error = PipelineError;

    fn inner(&self) -> &ResourceClient<Order, PipelinePolicy> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        PipelineError::from(e)
    }
}

impl PipelineClient {
    async fn command(&self, command: PipelineCommand) -> Result<PipelineReply, PipelineError> {
        Ok(self.inner.command(command).await?)
    }

    /// Queues a new pending order and returns it.
    #[instrument(
        skip(self, params),
        fields(product = %params.product_id, priority = ?params.priority)
    )]
    pub async fn submit(&self, params: OrderCreate) -> Result<Order, PipelineError> {
        debug!(?params, "Submitting order");
        match self.command(PipelineCommand::Submit(params)).await? {
            PipelineReply::Submitted(order) => Ok(order),
            _ => unreachable!("Submit command must return Submitted reply"),
        }
    }

    /// Takes the next pending order for the drain loop; `None` when both lanes are empty.
    pub async fn next_order(&self) -> Result<Option<Order>, PipelineError> {
        match self.command(PipelineCommand::NextOrder).await? {
            PipelineReply::Next(order) => Ok(order),
            _ => unreachable!("NextOrder command must return Next reply"),
        }
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn finish(&self, id: OrderId, outcome: Fulfillment) -> Result<Order, PipelineError> {
        match self.command(PipelineCommand::Finish { id, outcome }).await? {
            PipelineReply::Finished(order) => Ok(order),
            _ => unreachable!("Finish command must return Finished reply"),
        }
    }

    /// External override. Terminal states stamp `completed_at`.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        error: Option<String>,
    ) -> Result<Order, PipelineError> {
        Ok(self
            .inner
            .update(id, OrderStatusUpdate { status, error })
            .await?)
    }

    pub async fn queue_status(&self) -> Result<QueueStatus, PipelineError> {
        match self.command(PipelineCommand::QueueStatus).await? {
            PipelineReply::QueueStatus(status) => Ok(status),
            _ => unreachable!("QueueStatus command must return QueueStatus reply"),
        }
    }

    /// Every order, newest first, plus the queue status.
    pub async fn snapshot(&self) -> Result<OrdersSnapshot, PipelineError> {
        match self.command(PipelineCommand::Orders).await? {
            PipelineReply::Orders(snapshot) => Ok(snapshot),
            _ => unreachable!("Orders command must return Orders reply"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, ProductId};
    use actor_framework::mock::{create_mock_client, expect_command, MockClient};
    use actor_framework::ResourceRequest;

    #[tokio::test]
    async fn submit_forwards_the_payload() {
        let (client, mut receiver) = create_mock_client::<Order, PipelinePolicy>(10);
        let pipeline = PipelineClient::new(client);
        let params = OrderCreate {
            user_id: "user-7".into(),
            product_id: ProductId(5),
            product_name: "USB-C Hub".into(),
            quantity: 2,
            priority: Priority::Expedited,
        };
        let expected = Order::new(OrderId(1), params.clone());
        let reply = expected.clone();

        let task = tokio::spawn(async move { pipeline.submit(params).await });

        let (command, responder) = expect_command(&mut receiver)
            .await
            .expect("Expected Command request");
        match command {
            PipelineCommand::Submit(p) => {
                assert_eq!(p.user_id, "user-7");
                assert_eq!(p.priority, Priority::Expedited);
            }
            other => panic!("Expected Submit, got {:?}", other),
        }
        responder.send(Ok(PipelineReply::Submitted(reply))).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), expected);
    }

    #[tokio::test]
    async fn unknown_order_update_is_not_found() {
        let (client, mut receiver) = create_mock_client::<Order, PipelinePolicy>(10);
        let pipeline = PipelineClient::new(client);

        let task = tokio::spawn(async move {
            pipeline
                .update_status(OrderId(9), OrderStatus::Completed, None)
                .await
        });

        match receiver.recv().await {
            Some(ResourceRequest::Update {
                id,
                update,
                respond_to,
            }) => {
                assert_eq!(id, OrderId(9));
                assert_eq!(update.status, OrderStatus::Completed);
                respond_to
                    .send(Err(FrameworkError::NotFound(id.to_string())))
                    .unwrap();
            }
            _ => panic!("Expected Update request"),
        }
        assert_eq!(
            task.await.unwrap().unwrap_err(),
            PipelineError::NotFound("order-9".into())
        );
    }

    #[tokio::test]
    async fn empty_lanes_yield_no_order() {
        let mut mock = MockClient::<Order, PipelinePolicy>::new();
        mock.expect_command().return_ok(PipelineReply::Next(None));

        let pipeline = PipelineClient::new(mock.client());
        assert!(pipeline.next_order().await.unwrap().is_none());
        mock.verify();
    }
}
