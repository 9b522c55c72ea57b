use crate::domain::{
    decode_event, extract_respawn_details, filter_event, FilterDecision, PipelineResult,
    SpeciesLoginSink,
};
use common::domain::SpeciesLogin;
use tracing::{debug, Span};

/// What happened to a message that made it through the pipeline without error
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// A species login row was written
    Persisted(SpeciesLogin),
    /// Not a `PlayerRespawn` event; nothing was written
    Skipped { event: Option<String> },
}

/// Domain service that runs one payload through the respawn pipeline
///
/// Flow:
/// 1. Decode the payload as a JSON object
/// 2. Skip anything that is not a `PlayerRespawn` event
/// 3. Extract `DinosaurType` and `PlayerAlderonId` from the embed description
/// 4. Write a species login through the sink
pub struct RespawnEventService {
    sink: SpeciesLoginSink,
}

impl RespawnEventService {
    pub fn new(sink: SpeciesLoginSink) -> Self {
        Self { sink }
    }

    /// Records `event`, `aid` and `species` on the current span as they become known.
    pub async fn process_payload(
        &self,
        payload: impl AsRef<[u8]>,
    ) -> PipelineResult<PipelineOutcome> {
        let payload = payload.as_ref();
        let event = decode_event(payload)?;
        debug!(payload = %String::from_utf8_lossy(payload), "decoded event payload");

        let span = Span::current();
        if let Some(name) = event.event_name() {
            span.record("event", name);
        }

        if filter_event(&event) == FilterDecision::Skip {
            return Ok(PipelineOutcome::Skipped {
                event: event.event_name().map(str::to_string),
            });
        }

        let details = extract_respawn_details(&event)?;
        span.record("aid", details.aid.as_str());
        span.record("species", details.species.as_str());
        debug!(
            species = %details.species,
            aid = %details.aid,
            "extracted respawn details"
        );

        let login = self
            .sink
            .log_species_event(&details.aid, &details.species)
            .await?;

        Ok(PipelineOutcome::Persisted(login))
    }
}
