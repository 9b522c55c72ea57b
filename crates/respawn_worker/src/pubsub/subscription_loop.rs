use crate::domain::{PipelineError, PipelineOutcome, RespawnEventService};
use common::domain::{DomainError, DomainResult, InboundMessage, PubSubConnector};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, instrument, warn, Instrument, Span};

/// Channel carrying game events. Fixed; not part of the configuration.
pub const POT_EVENTS_CHANNEL: &str = "pot_events";

/// Longest payload prefix included in decode-failure logs
const PAYLOAD_SNIPPET_CHARS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Connecting,
    Subscribed,
    Listening,
    Terminated,
}

/// Owns the single subscription to [`POT_EVENTS_CHANNEL`] and pushes every data
/// message through the respawn pipeline, one at a time, in delivery order.
pub struct SubscriptionLoop {
    connector: Arc<dyn PubSubConnector>,
    service: Arc<RespawnEventService>,
    state: SubscriptionState,
}

impl SubscriptionLoop {
    pub fn new(connector: Arc<dyn PubSubConnector>, service: Arc<RespawnEventService>) -> Self {
        Self {
            connector,
            service,
            state: SubscriptionState::Connecting,
        }
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Connect, subscribe, and listen until the connection drops or `ctx` is cancelled.
    ///
    /// Connect and subscribe failures, and the end of the message stream, are returned
    /// as errors. Per-message failures are logged and never returned.
    #[instrument(name = "subscription_loop", skip_all, fields(channel = POT_EVENTS_CHANNEL))]
    pub async fn run(&mut self, ctx: CancellationToken) -> DomainResult<()> {
        self.transition(SubscriptionState::Connecting);
        let mut subscription = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                self.transition(SubscriptionState::Terminated);
                return Ok(());
            }
            result = self.connector.connect() => match result {
                Ok(subscription) => subscription,
                Err(e) => {
                    self.transition(SubscriptionState::Terminated);
                    return Err(e);
                }
            },
        };

        if let Err(e) = subscription.subscribe(POT_EVENTS_CHANNEL).await {
            self.transition(SubscriptionState::Terminated);
            return Err(e);
        }
        self.transition(SubscriptionState::Subscribed);
        info!(
            target_addr = %self.connector.target(),
            channel = POT_EVENTS_CHANNEL,
            "subscribed to channel"
        );

        self.transition(SubscriptionState::Listening);
        loop {
            tokio::select! {
                biased;
                _ = ctx.cancelled() => {
                    info!("received shutdown signal, stopping subscription loop");
                    self.transition(SubscriptionState::Terminated);
                    return Ok(());
                }
                next = subscription.next_message() => match next {
                    Some(message) => handle_message(&self.service, message).await,
                    None => {
                        self.transition(SubscriptionState::Terminated);
                        return Err(DomainError::ConnectionError(format!(
                            "message stream for channel {} ended",
                            POT_EVENTS_CHANNEL
                        )));
                    }
                },
            }
        }
    }

    fn transition(&mut self, next: SubscriptionState) {
        debug!(from = ?self.state, to = ?next, "subscription state change");
        self.state = next;
    }
}

/// Run one message through the pipeline and log the result.
///
/// Each message gets its own root span, so it is not nested under the long-lived
/// subscription span.
pub(crate) async fn handle_message(service: &RespawnEventService, message: InboundMessage) {
    if !message.is_data() {
        debug!(channel = %message.channel, "ignoring control message");
        return;
    }

    let span = info_span!(
        parent: Span::none(),
        "pot_event",
        channel = %message.channel,
        payload_size = message.payload.len(),
        event = tracing::field::Empty,
        aid = tracing::field::Empty,
        species = tracing::field::Empty,
    );

    async {
        match service.process_payload(&message.payload).await {
            Ok(PipelineOutcome::Persisted(login)) => {
                debug!(aid = %login.aid, "respawn event persisted");
            }
            Ok(PipelineOutcome::Skipped { event }) => {
                debug!(event = ?event, "skipping non-respawn event");
            }
            Err(PipelineError::Decode(e)) => {
                warn!(
                    error = %e,
                    payload = %payload_snippet(&message.payload),
                    "JSON parse failed, dropping message"
                );
            }
            Err(e @ PipelineError::Extraction(_)) => {
                warn!(error = %e, "malformed respawn event, dropping message");
            }
            Err(e @ PipelineError::IncompleteFields { .. }) => {
                warn!(error = %e, "respawn event without species or AID, dropping message");
            }
            Err(PipelineError::Persistence { aid, .. }) => {
                // Already logged by the sink with the underlying error.
                debug!(aid = %aid, "species login not persisted, continuing");
            }
        }
    }
    .instrument(span)
    .await
}

fn payload_snippet(payload: &[u8]) -> String {
    let text = String::from_utf8_lossy(payload);
    let mut chars = text.chars();
    let snippet: String = chars.by_ref().take(PAYLOAD_SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", snippet)
    } else {
        snippet
    }
}
