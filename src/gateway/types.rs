//! Gateway wire shapes.

use serde::{Deserialize, Serialize};

/// A chat request forwarded upstream. The gateway accepts only flat text;
/// the session key is a continuation hint letting it resume the same
/// conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub content: String,
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
}

/// One event on the gateway's streaming chat response.
///
/// Event types this subsystem does not interpret parse as `Other` and are
/// dropped by the bridge rather than surfaced as errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GatewayEvent {
    Text {
        #[serde(default)]
        text: Option<String>,
    },
    Done,
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_omits_absent_session_key() {
        let request = ChatRequest {
            content: "Hello".to_string(),
            agent_id: "agent-1".to_string(),
            session_key: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["content"], "Hello");
        assert_eq!(json["agentId"], "agent-1");
        assert!(json.get("sessionKey").is_none());
    }

    #[test]
    fn chat_request_includes_session_key_when_present() {
        let request = ChatRequest {
            content: "Hello".to_string(),
            agent_id: "agent-1".to_string(),
            session_key: Some("key-1".to_string()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["sessionKey"], "key-1");
    }

    #[test]
    fn parses_text_and_done_events() {
        let event: GatewayEvent = serde_json::from_str(r#"{"type":"text","text":"Hi"}"#).unwrap();
        assert!(matches!(event, GatewayEvent::Text { text: Some(ref t) } if t == "Hi"));

        let event: GatewayEvent = serde_json::from_str(r#"{"type":"text"}"#).unwrap();
        assert!(matches!(event, GatewayEvent::Text { text: None }));

        let event: GatewayEvent = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert!(matches!(event, GatewayEvent::Done));
    }

    #[test]
    fn unknown_event_types_parse_as_other() {
        let event: GatewayEvent =
            serde_json::from_str(r#"{"type":"toolCall","toolName":"search"}"#).unwrap();
        assert!(matches!(event, GatewayEvent::Other));
    }

    #[test]
    fn malformed_events_fail_to_parse() {
        assert!(serde_json::from_str::<GatewayEvent>("not json").is_err());
        assert!(serde_json::from_str::<GatewayEvent>(r#"{"text":"no type"}"#).is_err());
    }
}
