//! Bhashini endpoints: direct capability calls and the complete voice flow

use axum::extract::{Json, State};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use agrisaarthi_core::{audio::strip_data_url, AudioFormat, AudioInput, Language, VoiceGender};
use agrisaarthi_pipeline::VoiceRequest;

use crate::metrics::record_request;
use crate::state::AppState;
use crate::{parse_language, ServerError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRequest {
    #[serde(default)]
    audio_content: Option<String>,
    #[serde(default)]
    audio_format: Option<String>,
    #[serde(default)]
    source_language: Option<String>,
    #[serde(default)]
    target_language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsrResponse {
    success: bool,
    recognized_text: String,
    language: Language,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    source_language: Option<String>,
    #[serde(default)]
    target_language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    success: bool,
    original_text: String,
    translated_text: String,
    source_language: Language,
    target_language: Language,
}

/// `/api/bhashini/tts` uses `targetLanguage`, `/api/tts` uses `language`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsRequest {
    #[serde(default)]
    text: String,
    #[serde(default, alias = "language")]
    target_language: Option<String>,
    #[serde(default)]
    gender: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsResponse {
    success: bool,
    audio_content: String,
    language: Language,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteFlowResponse {
    success: bool,
    recognized_text: String,
    recognized_language: Language,
    question_in_english: String,
    answer_in_english: String,
    answer_translated: String,
    answer_language: Language,
    answer_audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRequest {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    source_language: Option<String>,
    #[serde(default)]
    target_language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    success: bool,
    extracted_text: String,
    translated_text: String,
    analysis: String,
}

/// Decode the request's base64 audio, enforcing the size limit
fn decode_audio(state: &AppState, request: &AudioRequest) -> Result<AudioInput, ServerError> {
    let encoded = request
        .audio_content
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("No audio content provided".to_string()))?;

    let format = request
        .audio_format
        .as_deref()
        .and_then(AudioFormat::from_str_loose)
        .unwrap_or(state.config.bhashini.asr_audio_format);

    let audio = AudioInput::from_base64(encoded, format)
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
    audio
        .ensure_within(state.config.bhashini.max_audio_bytes)
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
    Ok(audio)
}

pub async fn asr(
    State(state): State<AppState>,
    Json(request): Json<AudioRequest>,
) -> Result<Json<AsrResponse>, ServerError> {
    record_request("asr");
    let audio = decode_audio(&state, &request)?;
    let language = parse_language(request.source_language.as_deref(), state.config.pipeline.source())?;

    let utterance = state
        .orchestrator
        .capabilities()
        .recognizer
        .recognize(&audio, language)
        .await
        .map_err(|e| ServerError::from_capability(&e, "Speech recognition failed"))?;

    Ok(Json(AsrResponse {
        success: true,
        recognized_text: utterance.text,
        language,
    }))
}

pub async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ServerError> {
    record_request("translate");
    if request.text.trim().is_empty() {
        return Err(ServerError::InvalidRequest("No text provided".to_string()));
    }
    let pipeline = &state.config.pipeline;
    let source = parse_language(request.source_language.as_deref(), pipeline.source())?;
    let target = parse_language(request.target_language.as_deref(), pipeline.target())?;

    let translated_text = state
        .orchestrator
        .capabilities()
        .translator
        .translate(&request.text, source, target)
        .await;

    Ok(Json(TranslateResponse {
        success: true,
        original_text: request.text,
        translated_text,
        source_language: source,
        target_language: target,
    }))
}

async fn synthesize(
    state: &AppState,
    request: TtsRequest,
    failure: &str,
) -> Result<Json<TtsResponse>, ServerError> {
    if request.text.trim().is_empty() {
        return Err(ServerError::InvalidRequest("No text provided".to_string()));
    }
    let language = parse_language(request.target_language.as_deref(), state.config.pipeline.target())?;
    let gender = request
        .gender
        .as_deref()
        .and_then(VoiceGender::from_str_loose)
        .unwrap_or(state.orchestrator.default_gender());

    let audio_content = state
        .orchestrator
        .capabilities()
        .synthesizer
        .synthesize(&request.text, language, gender)
        .await
        .map_err(|e| ServerError::from_capability(&e, failure))?;

    Ok(Json(TtsResponse {
        success: true,
        audio_content,
        language,
    }))
}

pub async fn tts(
    State(state): State<AppState>,
    Json(request): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, ServerError> {
    record_request("tts");
    synthesize(&state, request, "Text-to-speech failed").await
}

pub async fn legacy_tts(
    State(state): State<AppState>,
    Json(request): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, ServerError> {
    record_request("tts");
    synthesize(&state, request, "TTS failed").await
}

pub async fn complete_flow(
    State(state): State<AppState>,
    Json(request): Json<AudioRequest>,
) -> Result<Json<CompleteFlowResponse>, ServerError> {
    record_request("complete_flow");
    let audio = decode_audio(&state, &request)?;
    let pipeline = &state.config.pipeline;
    let source = parse_language(request.source_language.as_deref(), pipeline.source())?;
    let target = parse_language(request.target_language.as_deref(), pipeline.target())?;

    tracing::info!(source = %source, target = %target, bytes = audio.len(), "Starting complete flow");

    let result = state
        .orchestrator
        .voice_flow(VoiceRequest {
            audio,
            source,
            target,
            gender: None,
        })
        .await?;

    Ok(Json(CompleteFlowResponse {
        success: true,
        recognized_text: result.recognized_text,
        recognized_language: result.recognized_language,
        question_in_english: result.question_in_working,
        answer_in_english: result.answer_in_working,
        answer_translated: result.answer_translated,
        answer_language: result.answer_language,
        answer_audio_content: result.audio_content,
    }))
}

pub async fn ocr(
    State(state): State<AppState>,
    Json(request): Json<OcrRequest>,
) -> Result<Json<OcrResponse>, ServerError> {
    record_request("ocr");
    let encoded = request
        .image
        .as_deref()
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("No image provided".to_string()))?;
    let image = STANDARD
        .decode(strip_data_url(encoded).trim())
        .map_err(|e| ServerError::InvalidRequest(format!("Invalid image encoding: {}", e)))?;

    let pipeline = &state.config.pipeline;
    let source = parse_language(request.source_language.as_deref(), pipeline.source())?;
    let target = parse_language(request.target_language.as_deref(), pipeline.target())?;

    let result = state.orchestrator.document_flow(&image, source, target).await?;

    Ok(Json(OcrResponse {
        success: true,
        extracted_text: result.extracted_text,
        translated_text: result.translated_text,
        analysis: result.analysis,
    }))
}
