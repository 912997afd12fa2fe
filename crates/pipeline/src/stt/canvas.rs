//! Legacy sandbox ASR: multipart upload, text from `data.recognized_text`

use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use agrisaarthi_config::BhashiniConfig;
use agrisaarthi_core::{AudioInput, CapabilityError, Language, SpeechRecognizer, Utterance};

use crate::http::{build_client, ensure_success, record_latency};

#[derive(Debug, Deserialize)]
struct CanvasAsrResponse {
    #[serde(default)]
    data: Option<CanvasAsrData>,
}

#[derive(Debug, Deserialize)]
struct CanvasAsrData {
    #[serde(default)]
    recognized_text: Option<String>,
}

pub struct CanvasRecognizer {
    client: Client,
    base_url: String,
    access_token: String,
    max_audio_bytes: usize,
}

impl CanvasRecognizer {
    pub fn new(config: &BhashiniConfig) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.canvas_base_url.trim_end_matches('/').to_string(),
            access_token: config.canvas_access_token.clone(),
            max_audio_bytes: config.max_audio_bytes,
        })
    }

    async fn upload(&self, audio: &AudioInput) -> Result<String, CapabilityError> {
        let part = Part::bytes(audio.bytes.clone())
            .file_name(format!("audio.{}", audio.format.as_str()))
            .mime_str(audio.format.mime_type())
            .map_err(|e| CapabilityError::InvalidInput(e.to_string()))?;
        let form = Form::new().part("audio_file", part);

        let response = self
            .client
            .post(format!("{}/sandboxbeprod/asr", self.base_url))
            .header("access-token", &self.access_token)
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body: CanvasAsrResponse = serde_json::from_str(&response.text().await?)?;

        body.data
            .and_then(|d| d.recognized_text)
            .ok_or_else(|| CapabilityError::MalformedResponse("missing data.recognized_text".to_string()))
    }
}

#[async_trait]
impl SpeechRecognizer for CanvasRecognizer {
    async fn recognize(
        &self,
        audio: &AudioInput,
        language: Language,
    ) -> Result<Utterance, CapabilityError> {
        audio.ensure_within(self.max_audio_bytes)?;
        if audio.is_empty() {
            return Err(CapabilityError::InvalidInput("empty audio".to_string()));
        }

        let start = Instant::now();
        let result = self.upload(audio).await;
        record_latency("asr", start.elapsed(), result.is_ok());

        let text = result.map_err(|e| {
            tracing::warn!(error = %e, "Canvas ASR failed");
            e
        })?;

        if text.trim().is_empty() {
            return Err(CapabilityError::EmptyResult("asr"));
        }

        Ok(Utterance::new(text.trim(), language))
    }

    fn name(&self) -> &str {
        "canvas"
    }
}
