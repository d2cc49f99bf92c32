//! Extraction of human-readable messages from remote error payloads.
//!
//! The backend and the media host report failures as either `{ "message": ... }` or
//! `{ "error": { "message": ... } }`. They disagree on which one is more specific, so
//! each caller picks its own preference order.

use crate::HttpFailure;
use serde_json::Value;

/// Where a message can live inside an error payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageField {
    /// `{ "message": "..." }`
    Message,
    /// `{ "error": { "message": "..." } }`, or `{ "error": "..." }`
    ErrorMessage,
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl MessageField {
    pub fn extract(self, body: &Value) -> Option<String> {
        match self {
            MessageField::Message => non_empty(body.get("message")),
            MessageField::ErrorMessage => {
                let error = body.get("error")?;
                non_empty(error.get("message")).or_else(|| non_empty(Some(error)))
            }
        }
    }
}

/// First message found in `body` following `order`.
pub fn first_message(body: &Value, order: &[MessageField]) -> Option<String> {
    order.iter().find_map(|field| field.extract(body))
}

/// First structured message carried by an HTTP failure, following `order`.
pub fn failure_message(failure: &HttpFailure, order: &[MessageField]) -> Option<String> {
    failure
        .json_body()
        .and_then(|body| first_message(&body, order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preference_order() {
        let body = json!({ "message": "top", "error": { "message": "nested" } });
        assert_eq!(
            first_message(&body, &[MessageField::Message, MessageField::ErrorMessage]).as_deref(),
            Some("top")
        );
        assert_eq!(
            first_message(&body, &[MessageField::ErrorMessage, MessageField::Message]).as_deref(),
            Some("nested")
        );
    }

    #[test]
    fn test_falls_through_blank_and_missing_fields() {
        let body = json!({ "message": "  ", "error": { "message": "Invalid Signature" } });
        assert_eq!(
            first_message(&body, &[MessageField::Message, MessageField::ErrorMessage]).as_deref(),
            Some("Invalid Signature")
        );
        assert_eq!(first_message(&json!({}), &[MessageField::Message]), None);
        assert_eq!(first_message(&json!([1, 2]), &[MessageField::ErrorMessage]), None);
    }

    #[test]
    fn test_error_as_plain_string() {
        let body = json!({ "error": "cloud name missing" });
        assert_eq!(
            MessageField::ErrorMessage.extract(&body).as_deref(),
            Some("cloud name missing")
        );
    }

    #[test]
    fn test_failure_message_ignores_non_json_bodies() {
        let failure = HttpFailure::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert_eq!(failure_message(&failure, &[MessageField::Message]), None);

        let failure = HttpFailure::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: r#"{"message":"folder is required"}"#.to_string(),
        };
        assert_eq!(
            failure_message(&failure, &[MessageField::Message]).as_deref(),
            Some("folder is required")
        );
    }
}
