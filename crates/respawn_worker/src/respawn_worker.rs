use crate::domain::{RespawnEventService, SpeciesLoginSink};
use crate::pubsub::SubscriptionLoop;
use common::domain::{PubSubConnector, SpeciesLoginRepository};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct RespawnWorker {
    connector: Arc<dyn PubSubConnector>,
    service: Arc<RespawnEventService>,
}

impl RespawnWorker {
    pub fn new(
        connector: Arc<dyn PubSubConnector>,
        repository: Arc<dyn SpeciesLoginRepository>,
    ) -> Self {
        debug!("initializing respawn worker module");
        let service = Arc::new(RespawnEventService::new(SpeciesLoginSink::new(repository)));
        Self { connector, service }
    }

    #[allow(clippy::type_complexity)]
    pub fn into_runner_process(
        self,
    ) -> Box<
        dyn FnOnce(
                CancellationToken,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
            > + Send,
    > {
        Box::new({
            let connector = self.connector;
            let service = self.service;
            move |ctx| {
                let mut subscription_loop = SubscriptionLoop::new(connector, service);
                Box::pin(async move {
                    subscription_loop.run(ctx).await?;
                    Ok(())
                })
            }
        })
    }
}
