//! In-memory store used when Supabase is not configured, and in tests
//!
//! Messages are kept in a bounded ring: once `capacity` replies are held the
//! oldest one is dropped for each new insert.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::RwLock;

use agrisaarthi_config::constants::memory::MESSAGE_CAPACITY;
use agrisaarthi_core::Language;

use crate::{MessageStore, NewMessage, PersistenceError, ProfileStore};

pub struct InMemoryStore {
    messages: RwLock<VecDeque<NewMessage>>,
    capacity: usize,
    languages: RwLock<HashMap<String, Language>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_capacity(MESSAGE_CAPACITY)
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` messages (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: RwLock::new(VecDeque::with_capacity(capacity.min(MESSAGE_CAPACITY))),
            capacity,
            languages: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_language(&self, user_id: impl Into<String>, language: Language) {
        self.languages.write().insert(user_id.into(), language);
    }

    /// Snapshot of stored messages, oldest first
    pub fn messages(&self) -> Vec<NewMessage> {
        self.messages.read().iter().cloned().collect()
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn insert_message(&self, message: NewMessage) -> Result<(), PersistenceError> {
        let mut messages = self.messages.write();
        while messages.len() >= self.capacity {
            messages.pop_front();
        }
        messages.push_back(message);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn preferred_language(&self, user_id: &str) -> Result<Option<Language>, PersistenceError> {
        Ok(self.languages.read().get(user_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_roundtrip() {
        let store = InMemoryStore::new();
        store.set_language("farmer-1", Language::Punjabi);

        store
            .insert_message(NewMessage::bot_reply("chat-9", "Sat Sri Akal"))
            .await
            .unwrap();

        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].sender_id, "bot-agrisaarthi");
        assert_eq!(
            store.preferred_language("farmer-1").await.unwrap(),
            Some(Language::Punjabi)
        );
        assert_eq!(store.preferred_language("unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest() {
        let store = InMemoryStore::with_capacity(3);
        for i in 0..5 {
            store
                .insert_message(NewMessage::bot_reply("chat-1", format!("reply {}", i)))
                .await
                .unwrap();
        }

        let contents: Vec<_> = store.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, ["reply 2", "reply 3", "reply 4"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        assert_eq!(InMemoryStore::with_capacity(0).capacity(), 1);
        assert_eq!(InMemoryStore::new().capacity(), MESSAGE_CAPACITY);
    }
}
