//! Conversation message types.

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    /// The remote party being engaged.
    #[serde(alias = "scammer", alias = "user")]
    Counterpart,
    /// The honeypot's own replies.
    Agent,
}

/// A single message in a conversation.
///
/// Immutable once recorded on a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: SenderRole,
    pub text: String,
    /// Unix timestamp in milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    pub fn counterpart(text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            sender: SenderRole::Counterpart,
            text: text.into(),
            timestamp,
        }
    }

    pub fn agent(text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            sender: SenderRole::Agent,
            text: text.into(),
            timestamp,
        }
    }

    pub fn is_counterpart(&self) -> bool {
        self.sender == SenderRole::Counterpart
    }
}

/// Channel metadata attached to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageMetadata {
    pub channel: String,
    pub language: String,
    pub locale: String,
}

impl Default for MessageMetadata {
    fn default() -> Self {
        Self {
            channel: "SMS".to_string(),
            language: "English".to_string(),
            locale: "IN".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_aliases() {
        let msg: Message =
            serde_json::from_str(r#"{"sender":"scammer","text":"hi","timestamp":1}"#).unwrap();
        assert_eq!(msg.sender, SenderRole::Counterpart);
        let msg: Message = serde_json::from_str(r#"{"sender":"agent","text":"ok"}"#).unwrap();
        assert_eq!(msg.sender, SenderRole::Agent);
        assert_eq!(msg.timestamp, 0);
    }

    #[test]
    fn test_metadata_defaults() {
        let meta: MessageMetadata = serde_json::from_str(r#"{"channel":"WhatsApp"}"#).unwrap();
        assert_eq!(meta.channel, "WhatsApp");
        assert_eq!(meta.locale, "IN");
    }
}
