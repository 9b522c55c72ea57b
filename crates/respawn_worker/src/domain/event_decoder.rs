use crate::domain::PipelineResult;
use serde_json::{Map, Value};

/// A decoded game event: the top-level JSON object of a pub/sub payload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    fields: Map<String, Value>,
}

impl DecodedEvent {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `event` field, if present and a string
    pub fn event_name(&self) -> Option<&str> {
        self.get("event").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for DecodedEvent {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Parse a raw payload into a [`DecodedEvent`].
///
/// Anything other than a UTF-8 JSON object (malformed text, invalid UTF-8 anywhere
/// in the payload, arrays, bare strings or numbers) is a decode error.
pub fn decode_event(payload: impl AsRef<[u8]>) -> PipelineResult<DecodedEvent> {
    let fields: Map<String, Value> = serde_json::from_slice(payload.as_ref())?;
    Ok(DecodedEvent { fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PipelineError;

    #[test]
    fn test_decode_object() {
        let event = decode_event(r#"{"event":"PlayerRespawn","data":{"embeds":[]}}"#).unwrap();
        assert_eq!(event.event_name(), Some("PlayerRespawn"));
        assert!(event.get("data").is_some());
    }

    #[test]
    fn test_decode_malformed_json() {
        let result = decode_event(r#"{"event": "PlayerRespawn""#);
        assert!(matches!(result, Err(PipelineError::Decode(_))));
    }

    #[test]
    fn test_decode_non_object_json() {
        assert!(matches!(decode_event("[1, 2, 3]"), Err(PipelineError::Decode(_))));
        assert!(matches!(decode_event(r#""PlayerRespawn""#), Err(PipelineError::Decode(_))));
        assert!(matches!(decode_event("42"), Err(PipelineError::Decode(_))));
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(matches!(decode_event(""), Err(PipelineError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8_inside_strings() {
        let mut payload = br#"{"event":"PlayerRespawn","data":{"embeds":[{"description":"DinosaurType: Rex"#.to_vec();
        payload.push(0xff);
        payload.extend_from_slice(br#"\nPlayerAlderonId: 1"}]}}"#);

        assert!(matches!(decode_event(&payload), Err(PipelineError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8_outside_strings() {
        assert!(matches!(
            decode_event(b"{\"event\":\"PlayerRespawn\"}\xfe"),
            Err(PipelineError::Decode(_))
        ));
    }

    #[test]
    fn test_event_name_requires_string() {
        let event = decode_event(r#"{"event": 7}"#).unwrap();
        assert_eq!(event.event_name(), None);
    }
}
