use async_trait::async_trait;

use agrisaarthi_config::constants::service_ids;
use agrisaarthi_config::BhashiniConfig;
use agrisaarthi_core::{CapabilityError, Language, Translator};

use crate::dhruva::{DhruvaClient, InputData, TaskConfig, TaskType};

/// IndicTrans2 translation through the Dhruva pipeline
pub struct DhruvaTranslator {
    client: DhruvaClient,
}

impl DhruvaTranslator {
    pub fn new(config: &BhashiniConfig) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: DhruvaClient::new(config)?,
        })
    }
}

#[async_trait]
impl Translator for DhruvaTranslator {
    async fn try_translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, CapabilityError> {
        let config = TaskConfig::new(service_ids::TRANSLATION, source).with_target(target);
        let response = self
            .client
            .run(TaskType::Translation, config, InputData::text(text))
            .await?;
        response.translated_text()
    }

    fn name(&self) -> &str {
        "dhruva"
    }
}
