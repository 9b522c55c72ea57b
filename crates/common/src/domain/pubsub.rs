use crate::domain::result::DomainResult;
use async_trait::async_trait;

/// Discriminator for traffic received on a pub/sub connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A payload published to a subscribed channel
    Message,
    /// Subscribe acknowledgements and other protocol traffic
    Control,
}

/// A message received from the pub/sub transport, owned by the subscription loop
/// for the duration of one dispatch
///
/// The payload is kept as the bytes the transport delivered; text validation is left
/// to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub kind: MessageKind,
    pub channel: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn message(channel: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: MessageKind::Message,
            channel: channel.into(),
            payload: payload.into(),
        }
    }

    pub fn control(channel: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Control,
            channel: channel.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_data(&self) -> bool {
        self.kind == MessageKind::Message
    }
}

/// Trait for opening pub/sub connections
/// Abstracts the transport so the subscription loop can be driven by a mock
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PubSubConnector: Send + Sync {
    /// Open a new pub/sub connection
    async fn connect(&self) -> DomainResult<Box<dyn PubSubSubscription>>;

    /// Connection target, for logging (credentials must not be included)
    fn target(&self) -> String;
}

/// Trait for an open pub/sub connection
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PubSubSubscription: Send {
    /// Subscribe to a channel
    async fn subscribe(&mut self, channel: &str) -> DomainResult<()>;

    /// Wait for the next message.
    /// Returns `None` once the connection is gone; no further messages will arrive.
    async fn next_message(&mut self) -> Option<InboundMessage>;
}
