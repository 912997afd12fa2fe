//! Bhashini Dhruva inference pipeline client
//!
//! Every Dhruva capability (ASR, translation, TTS) is a POST of one
//! `pipelineTasks` entry plus `inputData` to the same URL. This module owns
//! the wire types and the single call; the capability wrappers pick the task
//! config and read their field out of `pipelineResponse[0]`.

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use agrisaarthi_config::constants::service_ids;
use agrisaarthi_config::BhashiniConfig;
use agrisaarthi_core::{CapabilityError, Language, LanguageFamily};

use crate::http::{build_client, ensure_success, record_latency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Asr,
    Translation,
    Tts,
}

impl TaskType {
    fn metric_label(&self) -> &'static str {
        match self {
            Self::Asr => "asr",
            Self::Translation => "mt",
            Self::Tts => "tts",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineRequest<'a> {
    pipeline_tasks: [PipelineTask<'a>; 1],
    input_data: InputData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineTask<'a> {
    task_type: TaskType,
    config: TaskConfig<'a>,
}

/// Per-task configuration block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig<'a> {
    language: LanguageConfig,
    service_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_format: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sampling_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gender: Option<&'a str>,
}

impl<'a> TaskConfig<'a> {
    pub fn new(service_id: &'a str, source: Language) -> Self {
        Self {
            language: LanguageConfig {
                source_language: source.code(),
                target_language: None,
            },
            service_id,
            audio_format: None,
            sampling_rate: None,
            gender: None,
        }
    }

    pub fn with_target(mut self, target: Language) -> Self {
        self.language.target_language = Some(target.code());
        self
    }

    pub fn with_audio_format(mut self, format: &'a str) -> Self {
        self.audio_format = Some(format);
        self
    }

    pub fn with_sampling_rate(mut self, rate: u32) -> Self {
        self.sampling_rate = Some(rate);
        self
    }

    pub fn with_gender(mut self, gender: &'a str) -> Self {
        self.gender = Some(gender);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct LanguageConfig {
    source_language: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_language: Option<&'static str>,
}

/// `inputData`: either base64 audio or text
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InputData<'a> {
    Audio { audio: [AudioContent<'a>; 1] },
    Text { input: [TextSource<'a>; 1] },
}

impl<'a> InputData<'a> {
    pub fn audio(audio_content: &'a str) -> Self {
        Self::Audio {
            audio: [AudioContent { audio_content }],
        }
    }

    pub fn text(source: &'a str) -> Self {
        Self::Text {
            input: [TextSource { source }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioContent<'a> {
    audio_content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TextSource<'a> {
    source: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    #[serde(default)]
    pipeline_response: Vec<TaskOutput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskOutput {
    #[serde(default)]
    output: Vec<TextOutput>,
    #[serde(default)]
    audio: Vec<AudioOutput>,
}

#[derive(Debug, Default, Deserialize)]
struct TextOutput {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudioOutput {
    #[serde(default)]
    audio_content: Option<String>,
}

impl PipelineResponse {
    fn first(&self) -> Result<&TaskOutput, CapabilityError> {
        self.pipeline_response.first().ok_or_else(|| {
            CapabilityError::MalformedResponse("missing pipelineResponse[0]".to_string())
        })
    }

    /// `pipelineResponse[0].output[0].source` (ASR)
    pub fn recognized_text(&self) -> Result<String, CapabilityError> {
        self.first()?
            .output
            .first()
            .and_then(|o| o.source.clone())
            .ok_or_else(|| CapabilityError::MalformedResponse("missing output[0].source".to_string()))
    }

    /// `pipelineResponse[0].output[0].target` (translation)
    pub fn translated_text(&self) -> Result<String, CapabilityError> {
        self.first()?
            .output
            .first()
            .and_then(|o| o.target.clone())
            .ok_or_else(|| CapabilityError::MalformedResponse("missing output[0].target".to_string()))
    }

    /// `pipelineResponse[0].audio[0].audioContent` (TTS)
    pub fn audio_content(&self) -> Result<String, CapabilityError> {
        self.first()?
            .audio
            .first()
            .and_then(|a| a.audio_content.clone())
            .ok_or_else(|| {
                CapabilityError::MalformedResponse("missing audio[0].audioContent".to_string())
            })
    }
}

/// ASR service id for the language's model family
pub fn asr_service_id(language: Language) -> &'static str {
    match language.family() {
        LanguageFamily::English => service_ids::ASR_ENGLISH,
        LanguageFamily::IndoAryan => service_ids::ASR_INDO_ARYAN,
        LanguageFamily::Dravidian => service_ids::ASR_DRAVIDIAN,
    }
}

/// TTS service id for the language's model family
pub fn tts_service_id(language: Language) -> &'static str {
    match language.family() {
        LanguageFamily::English => service_ids::TTS_MISC,
        LanguageFamily::IndoAryan => service_ids::TTS_INDO_ARYAN,
        LanguageFamily::Dravidian => service_ids::TTS_DRAVIDIAN,
    }
}

/// Shared Dhruva HTTP client
#[derive(Clone)]
pub struct DhruvaClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl DhruvaClient {
    pub fn new(config: &BhashiniConfig) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Run a single pipeline task
    pub async fn run(
        &self,
        task_type: TaskType,
        config: TaskConfig<'_>,
        input: InputData<'_>,
    ) -> Result<PipelineResponse, CapabilityError> {
        let service_id = config.service_id;
        let request = PipelineRequest {
            pipeline_tasks: [PipelineTask { task_type, config }],
            input_data: input,
        };

        let start = Instant::now();
        let result = self.send(&request).await;
        record_latency(task_type.metric_label(), start.elapsed(), result.is_ok());

        match &result {
            Ok(_) => tracing::debug!(
                task = task_type.metric_label(),
                service_id,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Dhruva task completed"
            ),
            Err(e) => tracing::warn!(
                task = task_type.metric_label(),
                service_id,
                error = %e,
                "Dhruva task failed"
            ),
        }

        result
    }

    async fn send(&self, request: &PipelineRequest<'_>) -> Result<PipelineResponse, CapabilityError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", &self.api_key)
            .json(request)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
