//! Dhruva ASR: base64 audio in JSON, text from `output[0].source`

use async_trait::async_trait;

use agrisaarthi_config::BhashiniConfig;
use agrisaarthi_core::{AudioInput, CapabilityError, Language, SpeechRecognizer, Utterance};

use crate::dhruva::{asr_service_id, DhruvaClient, InputData, TaskConfig, TaskType};

pub struct DhruvaRecognizer {
    client: DhruvaClient,
    sampling_rate: u32,
    max_audio_bytes: usize,
}

impl DhruvaRecognizer {
    pub fn new(config: &BhashiniConfig) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: DhruvaClient::new(config)?,
            sampling_rate: config.asr_sampling_rate,
            max_audio_bytes: config.max_audio_bytes,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for DhruvaRecognizer {
    async fn recognize(
        &self,
        audio: &AudioInput,
        language: Language,
    ) -> Result<Utterance, CapabilityError> {
        audio.ensure_within(self.max_audio_bytes)?;
        if audio.is_empty() {
            return Err(CapabilityError::InvalidInput("empty audio".to_string()));
        }

        let encoded = audio.to_base64();
        let config = TaskConfig::new(asr_service_id(language), language)
            .with_audio_format(audio.format.as_str())
            .with_sampling_rate(self.sampling_rate);

        let response = self
            .client
            .run(TaskType::Asr, config, InputData::audio(&encoded))
            .await?;

        let text = response.recognized_text()?;
        if text.trim().is_empty() {
            return Err(CapabilityError::EmptyResult("asr"));
        }

        tracing::info!(
            language = %language,
            chars = text.chars().count(),
            "Speech recognized"
        );

        Ok(Utterance::new(text.trim(), language))
    }

    fn name(&self) -> &str {
        "dhruva"
    }
}
