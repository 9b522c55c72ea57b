use crate::domain::DecodedEvent;

pub const PLAYER_RESPAWN_EVENT: &str = "PlayerRespawn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Process,
    Skip,
}

/// Only `PlayerRespawn` events go further down the pipeline.
pub fn filter_event(event: &DecodedEvent) -> FilterDecision {
    match event.event_name() {
        Some(PLAYER_RESPAWN_EVENT) => FilterDecision::Process,
        _ => FilterDecision::Skip,
    }
}
