//! Message and profile store traits

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use agrisaarthi_config::constants::bot;
use agrisaarthi_core::Language;

use crate::PersistenceError;

/// Row inserted into the `messages` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: String,
}

impl NewMessage {
    /// Text reply authored by the bot user
    pub fn bot_reply(chat_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            sender_id: bot::SENDER_ID.to_string(),
            content: content.into(),
            message_type: bot::MESSAGE_TYPE.to_string(),
        }
    }
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, message: NewMessage) -> Result<(), PersistenceError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `None` when the profile is missing or its language is unknown
    async fn preferred_language(&self, user_id: &str) -> Result<Option<Language>, PersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_reply_row() {
        let message = NewMessage::bot_reply("chat-1", "Namaste");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "chat_id": "chat-1",
                "sender_id": "bot-agrisaarthi",
                "content": "Namaste",
                "type": "text"
            })
        );
    }
}
