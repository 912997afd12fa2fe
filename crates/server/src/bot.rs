//! Chat bot webhook endpoints
//!
//! Answers are written back to the chat as a bot-authored row in the
//! message store, in the user's profile language.

use axum::extract::{Json, State};
use serde::Deserialize;

use agrisaarthi_core::{AudioFormat, AudioInput, CapabilityError, Language};
use agrisaarthi_persistence::NewMessage;

use crate::metrics::record_request;
use crate::state::AppState;
use crate::ServerError;

pub const NOT_UNDERSTOOD: &str =
    "I couldn't understand your audio message. Please try speaking more clearly.";

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    chat_id: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AudioMessageRequest {
    #[serde(default)]
    chat_id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    audio_url: Option<String>,
    #[serde(default)]
    audio_content: Option<String>,
    #[serde(default)]
    audio_format: Option<String>,
}

fn required(field: Option<String>) -> Result<String, ServerError> {
    field
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("Missing required fields".to_string()))
}

fn sent() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "success",
        "message": "Bot response sent",
    }))
}

/// Profile language, falling back to the configured default on miss or error
async fn user_language(state: &AppState, user_id: &str) -> Language {
    let default = state.config.pipeline.profile_language();
    match state.persistence.profiles.preferred_language(user_id).await {
        Ok(Some(language)) => language,
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Profile lookup failed, using default language");
            default
        }
    }
}

async fn store_reply(state: &AppState, chat_id: String, reply: String) -> Result<(), ServerError> {
    state
        .persistence
        .messages
        .insert_message(NewMessage::bot_reply(chat_id, reply))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to insert bot message");
            ServerError::Persistence("Failed to save bot response".to_string())
        })
}

pub async fn process_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<serde_json::Value>, ServerError> {
    record_request("bot_message");
    let chat_id = required(request.chat_id)?;
    let content = required(request.content)?;
    let user_id = required(request.user_id)?;

    let language = user_language(&state, &user_id).await;
    tracing::info!(chat_id = %chat_id, language = %language, "Processing bot message");

    let result = state.orchestrator.text_flow(&content, language).await;
    store_reply(&state, chat_id, result.reply).await?;
    Ok(sent())
}

async fn load_audio(
    state: &AppState,
    request: &AudioMessageRequest,
) -> Result<AudioInput, CapabilityError> {
    let format = request
        .audio_format
        .as_deref()
        .and_then(AudioFormat::from_str_loose)
        .unwrap_or(state.config.bhashini.asr_audio_format);

    match (request.audio_content.as_deref(), request.audio_url.as_deref()) {
        (Some(encoded), _) if !encoded.trim().is_empty() => {
            let audio = AudioInput::from_base64(encoded, format)?;
            audio.ensure_within(state.config.bhashini.max_audio_bytes)?;
            Ok(audio)
        }
        (_, Some(url)) if !url.trim().is_empty() => state.audio_fetcher.fetch(url, format).await,
        _ => Err(CapabilityError::InvalidInput("No audio provided".to_string())),
    }
}

pub async fn process_audio(
    State(state): State<AppState>,
    Json(request): Json<AudioMessageRequest>,
) -> Result<Json<serde_json::Value>, ServerError> {
    record_request("bot_audio");
    let has_audio = [&request.audio_content, &request.audio_url]
        .iter()
        .any(|f| f.as_deref().is_some_and(|v| !v.trim().is_empty()));
    if !has_audio {
        return Err(ServerError::InvalidRequest("Missing required fields".to_string()));
    }
    let chat_id = required(request.chat_id.clone())?;
    let user_id = required(request.user_id.clone())?;

    let language = user_language(&state, &user_id).await;

    let recognized = match load_audio(&state, &request).await {
        Ok(audio) => state
            .orchestrator
            .capabilities()
            .recognizer
            .recognize(&audio, language)
            .await
            .map(|u| u.text),
        Err(e @ CapabilityError::PayloadTooLarge { .. }) => {
            return Err(ServerError::InvalidRequest(e.to_string()))
        }
        Err(e) => Err(e),
    };

    let reply = match recognized {
        Ok(text) if !text.trim().is_empty() => {
            tracing::info!(chat_id = %chat_id, language = %language, "Processing bot audio message");
            state.orchestrator.text_flow(&text, language).await.reply
        }
        Ok(_) => {
            tracing::warn!(chat_id = %chat_id, "Audio message produced no transcript");
            NOT_UNDERSTOOD.to_string()
        }
        Err(e) => {
            tracing::warn!(chat_id = %chat_id, error = %e, "Audio message could not be recognized");
            NOT_UNDERSTOOD.to_string()
        }
    };

    store_reply(&state, chat_id, reply).await?;
    Ok(sent())
}
