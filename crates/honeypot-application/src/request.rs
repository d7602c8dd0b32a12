//! Turn ingestion request and response types.

use honeypot_core::error::{HoneypotError, Result};
use honeypot_core::session::{Message, MessageMetadata};
use serde::{Deserialize, Serialize};

/// One inbound message for a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub session_id: String,
    pub message: Message,
    /// Prior messages, imported only when the session is new.
    #[serde(default)]
    pub conversation_history: Vec<Message>,
    #[serde(default)]
    pub metadata: MessageMetadata,
}

impl TurnRequest {
    pub fn new(session_id: impl Into<String>, message: Message) -> Self {
        Self {
            session_id: session_id.into(),
            message,
            conversation_history: Vec::new(),
            metadata: MessageMetadata::default(),
        }
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.conversation_history = history;
        self
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Rejects requests that must not reach the engine.
    pub fn validate(&self) -> Result<()> {
        if self.session_id.trim().is_empty() {
            return Err(HoneypotError::validation("sessionId must not be empty"));
        }
        if self.message.text.trim().is_empty() {
            return Err(HoneypotError::validation("message.text must not be empty"));
        }
        if !self.message.is_counterpart() {
            return Err(HoneypotError::validation(
                "message.sender must be the counterpart",
            ));
        }
        Ok(())
    }
}

/// Reply to a turn ingestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub status: String,
    pub reply: String,
}

impl TurnResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            reply: reply.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_request() {
        let json = r#"{
            "sessionId": "abc",
            "message": {"sender": "scammer", "text": "Your account is blocked", "timestamp": 1700000000000},
            "conversationHistory": [],
            "metadata": {"channel": "WhatsApp", "language": "English", "locale": "IN"}
        }"#;
        let request: TurnRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.session_id, "abc");
        assert!(request.message.is_counterpart());
        assert_eq!(request.metadata.channel, "WhatsApp");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_blank_fields() {
        let blank_id = TurnRequest::new("  ", Message::counterpart("hi", 0));
        assert!(blank_id.validate().unwrap_err().is_validation());

        let blank_text = TurnRequest::new("abc", Message::counterpart("   ", 0));
        assert!(blank_text.validate().unwrap_err().is_validation());

        let agent = TurnRequest::new("abc", Message::agent("hello", 0));
        assert!(agent.validate().unwrap_err().is_validation());
    }
}
