//! Speech synthesis through the Dhruva pipeline

use async_trait::async_trait;

use agrisaarthi_config::BhashiniConfig;
use agrisaarthi_core::{CapabilityError, Language, SpeechSynthesizer, VoiceGender};

use crate::dhruva::{tts_service_id, DhruvaClient, InputData, TaskConfig, TaskType};

pub struct DhruvaSynthesizer {
    client: DhruvaClient,
    sampling_rate: u32,
}

impl DhruvaSynthesizer {
    pub fn new(config: &BhashiniConfig) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: DhruvaClient::new(config)?,
            sampling_rate: config.tts_sampling_rate,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for DhruvaSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
        gender: VoiceGender,
    ) -> Result<String, CapabilityError> {
        if text.trim().is_empty() {
            return Err(CapabilityError::InvalidInput("nothing to synthesize".to_string()));
        }

        let config = TaskConfig::new(tts_service_id(language), language)
            .with_gender(gender.as_str())
            .with_sampling_rate(self.sampling_rate);

        let response = self
            .client
            .run(TaskType::Tts, config, InputData::text(text))
            .await?;

        let audio = response.audio_content()?;
        if audio.is_empty() {
            return Err(CapabilityError::EmptyResult("tts"));
        }
        Ok(audio)
    }

    fn name(&self) -> &str {
        "dhruva"
    }
}
