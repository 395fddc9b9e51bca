//! Relay wire frames between browser and bridge.

use serde::{Deserialize, Serialize};

use crate::history::SessionMessage;

/// Inbound frame from the browser.
///
/// `{type: "history"}` requests a transcript; anything else is a chat
/// message (the protocol treats the absence of a discriminator as "chat").
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFrame {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<MessageContent>,
    pub agent_id: Option<String>,
    pub session_key: Option<String>,
}

impl ClientFrame {
    pub fn is_history(&self) -> bool {
        self.kind.as_deref() == Some("history")
    }
}

/// Chat content: either flat text or an ordered list of typed parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One typed fragment of a multi-part message body.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub text: Option<String>,
}

impl MessageContent {
    /// Flatten to the plain text the gateway accepts: text parts joined by
    /// a single space, in order. Non-text parts (attachments and the like)
    /// are dropped, not an error.
    pub fn flat_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|part| part.kind == "text")
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Outbound frame from the bridge to the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    Chunk {
        content: String,
        #[serde(rename = "messageId")]
        message_id: String,
    },
    Done {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    Error {
        message: String,
        #[serde(rename = "messageId")]
        message_id: String,
    },
    History { messages: Vec<SessionMessage> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Role;

    #[test]
    fn frame_without_discriminator_is_chat() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"content":"Hello","agentId":"agent-1"}"#).unwrap();

        assert!(!frame.is_history());
        assert_eq!(frame.agent_id.as_deref(), Some("agent-1"));
        assert!(matches!(frame.content, Some(MessageContent::Text(ref t)) if t == "Hello"));
        assert_eq!(frame.session_key, None);
    }

    #[test]
    fn history_frame_parses_with_optional_key() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"history","sessionKey":"key-1"}"#).unwrap();
        assert!(frame.is_history());
        assert_eq!(frame.session_key.as_deref(), Some("key-1"));

        let frame: ClientFrame = serde_json::from_str(r#"{"type":"history"}"#).unwrap();
        assert!(frame.is_history());
        assert_eq!(frame.session_key, None);
    }

    #[test]
    fn part_lists_flatten_to_text_parts_only() {
        let frame: ClientFrame = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "text", "text": "find X"},
                    {"type": "image", "url": "https://example.com/cat.png"}
                ],
                "agentId": "agent-1"
            }"#,
        )
        .unwrap();

        assert_eq!(frame.content.unwrap().flat_text(), "find X");
    }

    #[test]
    fn multiple_text_parts_join_with_single_spaces() {
        let content: MessageContent = serde_json::from_str(
            r#"[{"type":"text","text":"one"},{"type":"toolCall"},{"type":"text","text":"two"}]"#,
        )
        .unwrap();

        assert_eq!(content.flat_text(), "one two");
    }

    #[test]
    fn chunk_and_done_frames_serialize_with_message_id() {
        let chunk = ServerFrame::Chunk {
            content: "Hello back".to_string(),
            message_id: "m-1".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&chunk).unwrap(),
            r#"{"type":"chunk","content":"Hello back","messageId":"m-1"}"#
        );

        let done = ServerFrame::Done {
            message_id: "m-1".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&done).unwrap(),
            r#"{"type":"done","messageId":"m-1"}"#
        );
    }

    #[test]
    fn history_frame_serializes_messages() {
        let frame = ServerFrame::History {
            messages: vec![SessionMessage {
                role: Role::User,
                content: "Hello".to_string(),
                timestamp: None,
            }],
        };
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"type":"history","messages":[{"role":"user","content":"Hello"}]}"#
        );
    }
}
