//! Wire payloads exchanged with the webhook endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub session_id: String,
    pub chat_input: String,
}

impl WebhookRequest {
    pub fn new(session_id: impl Into<String>, chat_input: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            chat_input: chat_input.into(),
        }
    }
}

/// One element of the JSON array the webhook answers with.
///
/// Only `output` is read; any other keys the workflow emits are ignored.
#[derive(Deserialize, Debug, Default)]
pub struct WebhookReplyItem {
    #[serde(default)]
    pub output: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let request = WebhookRequest::new("abc-123", "Hello there");
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"sessionId": "abc-123", "chatInput": "Hello there"})
        );
    }

    #[test]
    fn reply_item_tolerates_missing_and_extra_keys() {
        let empty: WebhookReplyItem = serde_json::from_str("{}").expect("parse");
        assert!(empty.output.is_none());

        let extra: WebhookReplyItem =
            serde_json::from_str(r#"{"output":"hi","meta":{"tokens":3}}"#).expect("parse");
        assert_eq!(extra.output, Some(Value::String("hi".to_string())));
    }
}
