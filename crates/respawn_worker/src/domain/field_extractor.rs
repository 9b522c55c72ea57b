use crate::domain::{DecodedEvent, PipelineError, PipelineResult};
use serde_json::Value;
use std::collections::HashMap;

pub const DINOSAUR_TYPE_FIELD: &str = "DinosaurType";
pub const PLAYER_ALDERON_ID_FIELD: &str = "PlayerAlderonId";

const EMPHASIS_MARKER: &str = "**";
const FIELD_SEPARATOR: &str = ": ";

/// Every character that ends a line in a description, including the ASCII
/// separators and the Unicode line/paragraph breaks.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Key/value pairs parsed out of an embed description
pub type ExtractedFields = HashMap<String, String>;

/// The two fields a species login needs, both non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespawnDetails {
    pub aid: String,
    pub species: String,
}

/// Pull the respawn details out of a `PlayerRespawn` event.
pub fn extract_respawn_details(event: &DecodedEvent) -> PipelineResult<RespawnDetails> {
    let description = respawn_description(event)?;
    let fields = parse_description(description);
    required_fields(&fields)
}

/// Navigate to `data.embeds[0].description`.
pub fn respawn_description(event: &DecodedEvent) -> PipelineResult<&str> {
    let data = event
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| PipelineError::Extraction("data object".to_string()))?;

    let first_embed = data
        .get("embeds")
        .and_then(Value::as_array)
        .ok_or_else(|| PipelineError::Extraction("data.embeds array".to_string()))?
        .first()
        .and_then(Value::as_object)
        .ok_or_else(|| PipelineError::Extraction("data.embeds[0] object".to_string()))?;

    first_embed
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| PipelineError::Extraction("data.embeds[0].description string".to_string()))
}

/// Parse a line-oriented description into key/value pairs.
///
/// Lines end at `\n`, `\r` and every other Unicode line break. Each line is
/// trimmed and stripped of `**`, then split on the first `": "`.
/// Lines without the separator are ignored and later keys overwrite earlier ones.
pub fn parse_description(description: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::new();

    for line in description.split(LINE_BREAKS) {
        let clean = line.trim().replace(EMPHASIS_MARKER, "");
        if let Some((key, value)) = clean.split_once(FIELD_SEPARATOR) {
            fields.insert(key.to_string(), value.to_string());
        }
    }

    fields
}

/// Both `DinosaurType` and `PlayerAlderonId` must be present and non-empty.
pub fn required_fields(fields: &ExtractedFields) -> PipelineResult<RespawnDetails> {
    let species = fields.get(DINOSAUR_TYPE_FIELD).filter(|v| !v.is_empty());
    let aid = fields.get(PLAYER_ALDERON_ID_FIELD).filter(|v| !v.is_empty());

    match (species, aid) {
        (Some(species), Some(aid)) => Ok(RespawnDetails {
            aid: aid.clone(),
            species: species.clone(),
        }),
        _ => Err(PipelineError::IncompleteFields {
            species: fields.get(DINOSAUR_TYPE_FIELD).cloned(),
            aid: fields.get(PLAYER_ALDERON_ID_FIELD).cloned(),
        }),
    }
}
