use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{FilingInsightsError, Result};

/// Marker and payload written in place of a value the model failed to
/// produce as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    #[serde(rename = "_parse_error")]
    pub parse_error: bool,
    pub raw_text: String,
}

/// Result of normalizing raw model output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResponse {
    Parsed(Value),
    Failed(ParseFailure),
}

impl NormalizedResponse {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, NormalizedResponse::Failed(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            NormalizedResponse::Parsed(value) => Some(value),
            NormalizedResponse::Failed(_) => None,
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match self {
            NormalizedResponse::Parsed(_) => None,
            NormalizedResponse::Failed(failure) => Some(&failure.raw_text),
        }
    }

    /// Deserializes a parsed value into `T`.
    pub fn parse_into<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            NormalizedResponse::Parsed(value) => Ok(serde_json::from_value(value.clone())?),
            NormalizedResponse::Failed(failure) => {
                Err(FilingInsightsError::UnexpectedResponseShape(format!(
                    "model output is not JSON: {}",
                    failure.raw_text
                )))
            }
        }
    }
}

/// Recovers a JSON value from raw model output.
///
/// Tries the whole text first, then the span from the first `{` to the last
/// `}`. Anything else becomes a [`ParseFailure`] carrying the original text.
pub fn normalize(raw_text: &str) -> NormalizedResponse {
    if let Ok(value) = serde_json::from_str::<Value>(raw_text) {
        return NormalizedResponse::Parsed(value);
    }

    if let (Some(start), Some(end)) = (raw_text.find('{'), raw_text.rfind('}')) {
        if end > start {
            match serde_json::from_str::<Value>(&raw_text[start..=end]) {
                Ok(value) => {
                    debug!("Recovered JSON object from bytes {}..={}", start, end);
                    return NormalizedResponse::Parsed(value);
                }
                Err(e) => debug!("Embedded JSON object did not parse: {}", e),
            }
        }
    }

    NormalizedResponse::Failed(ParseFailure {
        parse_error: true,
        raw_text: raw_text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CompanyRiskOutput;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        let result = normalize(r#"{"a": 1, "b": [true, null]}"#);
        assert_eq!(result, NormalizedResponse::Parsed(json!({"a": 1, "b": [true, null]})));
    }

    #[test]
    fn test_non_object_json_is_accepted() {
        assert_eq!(normalize(" [1, 2] "), NormalizedResponse::Parsed(json!([1, 2])));
        assert_eq!(normalize("42"), NormalizedResponse::Parsed(json!(42)));
    }

    #[test]
    fn test_json_surrounded_by_prose() {
        let result = normalize("Here is the answer: {\"a\": 1} — end.");
        assert_eq!(result, NormalizedResponse::Parsed(json!({"a": 1})));
    }

    #[test]
    fn test_markdown_fenced_json() {
        let raw = "```json\n{\"company\": \"Apple\", \"key_risks\": []}\n```";
        let result = normalize(raw);
        assert_eq!(
            result.value(),
            Some(&json!({"company": "Apple", "key_risks": []}))
        );
    }

    #[test]
    fn test_no_json() {
        let result = normalize("no json here at all");
        assert!(result.is_parse_error());
        assert_eq!(result.raw_text(), Some("no json here at all"));
    }

    #[test]
    fn test_braces_in_wrong_order() {
        let result = normalize("} before {");
        assert!(result.is_parse_error());
    }

    #[test]
    fn test_invalid_embedded_object() {
        let raw = "Sure! {\"a\": 1,} trailing";
        let result = normalize(raw);
        assert_eq!(result.raw_text(), Some(raw));
    }

    #[test]
    fn test_two_objects_fail_rather_than_guess() {
        let result = normalize("first {\"a\": 1} then {\"b\": 2}");
        assert!(result.is_parse_error());
    }

    #[test]
    fn test_round_trip_of_serialized_values() {
        let values = [
            json!({"company": "Tesla", "key_risks": [{"category": "Market", "risk": "EV demand", "evidence_quote": "demand may decline"}]}),
            json!({"nested": {"deep": {"list": [1.5, -2, "x", null, false]}}}),
            json!("just a string"),
            json!({}),
        ];
        for value in values {
            let text = serde_json::to_string_pretty(&value).unwrap();
            assert_eq!(normalize(&text), NormalizedResponse::Parsed(value));
        }
    }

    #[test]
    fn test_failure_serializes_as_sentinel() {
        let json = serde_json::to_value(normalize("oops")).unwrap();
        assert_eq!(json, json!({"_parse_error": true, "raw_text": "oops"}));

        let json = serde_json::to_value(normalize("{\"a\": 1}")).unwrap();
        assert_eq!(json, json!({"a": 1}));
    }

    #[test]
    fn test_parse_into_typed_output() {
        let raw = "Result:\n{\"company\": \"Apple\", \"key_risks\": [{\"category\": \"Legal\", \"risk\": \"Antitrust\", \"evidence_quote\": \"App Store litigation\"}]}";
        let output: CompanyRiskOutput = normalize(raw).parse_into().unwrap();
        assert_eq!(output.company, "Apple");
        assert_eq!(output.key_risks[0].category, "Legal");

        let err = normalize("nothing").parse_into::<CompanyRiskOutput>().unwrap_err();
        assert!(matches!(err, FilingInsightsError::UnexpectedResponseShape(_)));

        let err = normalize("{\"company\": 3}")
            .parse_into::<CompanyRiskOutput>()
            .unwrap_err();
        assert!(matches!(err, FilingInsightsError::Serialization(_)));
    }
}
