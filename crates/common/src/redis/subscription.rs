use crate::domain::{DomainError, DomainResult, InboundMessage, PubSubSubscription};
use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::PubSub;
use tracing::debug;

/// An open Redis pub/sub connection.
///
/// Subscribe confirmations are consumed by the driver and never surface here, so
/// every message yielded is a data message.
pub struct RedisSubscription {
    pubsub: PubSub,
}

impl RedisSubscription {
    pub fn new(pubsub: PubSub) -> Self {
        Self { pubsub }
    }
}

#[async_trait]
impl PubSubSubscription for RedisSubscription {
    async fn subscribe(&mut self, channel: &str) -> DomainResult<()> {
        self.pubsub
            .subscribe(channel)
            .await
            .map_err(|e| DomainError::SubscriptionError(channel.to_string(), e.to_string()))?;
        debug!(channel = %channel, "redis SUBSCRIBE confirmed");
        Ok(())
    }

    async fn next_message(&mut self) -> Option<InboundMessage> {
        let msg = self.pubsub.on_message().next().await?;
        Some(InboundMessage::message(
            msg.get_channel_name(),
            msg.get_payload_bytes(),
        ))
    }
}
