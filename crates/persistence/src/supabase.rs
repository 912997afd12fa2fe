//! Supabase PostgREST store
//!
//! - insert: `POST {url}/rest/v1/messages`, 201 expected
//! - profile: `GET {url}/rest/v1/profiles?id=eq.{id}&select=language`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use agrisaarthi_config::PersistenceConfig;
use agrisaarthi_core::Language;

use crate::{MessageStore, NewMessage, PersistenceError, ProfileStore};

#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(default)]
    language: Option<String>,
}

pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(config: &PersistenceConfig) -> Result<Self, PersistenceError> {
        if config.supabase_url.is_empty() {
            return Err(PersistenceError::Configuration(
                "SUPABASE_URL not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PersistenceError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_key.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl MessageStore for SupabaseStore {
    async fn insert_message(&self, message: NewMessage) -> Result<(), PersistenceError> {
        let response = self
            .authorized(self.client.post(format!("{}/rest/v1/messages", self.base_url)))
            .header("Prefer", "return=minimal")
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(chat_id = %message.chat_id, status = status.as_u16(), "Message insert failed");
            return Err(PersistenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(chat_id = %message.chat_id, "Message stored");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for SupabaseStore {
    async fn preferred_language(&self, user_id: &str) -> Result<Option<Language>, PersistenceError> {
        let id_filter = format!("eq.{}", user_id);
        let response = self
            .authorized(self.client.get(format!("{}/rest/v1/profiles", self.base_url)))
            .query(&[("id", id_filter.as_str()), ("select", "language")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PersistenceError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let rows: Vec<ProfileRow> = serde_json::from_str(&response.text().await?)?;
        let language = rows
            .into_iter()
            .next()
            .and_then(|row| row.language)
            .and_then(|code| {
                let parsed = Language::from_str_loose(&code);
                if parsed.is_none() {
                    tracing::warn!(user_id, code = %code, "Unknown profile language");
                }
                parsed
            });

        Ok(language)
    }
}
