//! Parse-or-reject boundary for structured model output.
//!
//! Every call site that expects JSON from a text generator goes through
//! here; an unvalidated structure never flows past the network edge. The
//! lenient path tolerates prose around a single JSON object (common with
//! economy-tier models); the strict path, used on contract-tightened
//! retries, does not.

use serde::de::DeserializeOwned;

use crate::errors::GenerationError;

/// Extract the outermost JSON object from possibly prose-wrapped text.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse a typed payload out of raw model output.
///
/// `strict` requires the entire trimmed output to be the JSON object.
pub fn parse_payload<T: DeserializeOwned>(text: &str, strict: bool) -> Result<T, GenerationError> {
    let raw = if strict {
        let trimmed = text.trim();
        if !trimmed.starts_with('{') || !trimmed.ends_with('}') {
            return Err(GenerationError::MalformedOutput {
                reason: "strict contract violated: output is not a bare JSON object".to_string(),
            });
        }
        trimmed
    } else {
        extract_object(text).ok_or_else(|| GenerationError::MalformedOutput {
            reason: "no JSON object found in output".to_string(),
        })?
    };

    serde_json::from_str(raw).map_err(|e| GenerationError::MalformedOutput {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn lenient_parse_tolerates_surrounding_prose() {
        let out: Payload =
            parse_payload("Sure, here you go: {\"value\": 7} Hope that helps!", false).unwrap();
        assert_eq!(out.value, 7);
    }

    #[test]
    fn strict_parse_rejects_surrounding_prose() {
        let err = parse_payload::<Payload>("Sure: {\"value\": 7}", true).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput { .. }));
    }

    #[test]
    fn missing_object_is_malformed() {
        assert!(parse_payload::<Payload>("no json here", false).is_err());
    }

    #[test]
    fn wrong_shape_is_malformed() {
        assert!(parse_payload::<Payload>("{\"other\": true}", false).is_err());
    }
}
