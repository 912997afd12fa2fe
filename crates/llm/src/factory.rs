//! Builds the responder from configuration

use std::sync::Arc;
use std::time::Duration;

use agrisaarthi_advisory::RuleBasedResponder;
use agrisaarthi_config::GeminiConfig;

use crate::backend::GenerativeBackend;
use crate::gemini::GeminiBackend;
use crate::responder::GenerativeResponder;
use crate::LlmError;

/// One Gemini backend per configured model, in order
///
/// Without an API key no backend is created and every answer comes from
/// the rule-based responder.
pub fn create_responder(config: &GeminiConfig) -> Result<GenerativeResponder, LlmError> {
    if config.models.is_empty() {
        return Err(LlmError::Configuration("gemini.models is empty".to_string()));
    }

    let backends: Vec<Arc<dyn GenerativeBackend>> = if config.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY not set, answers will use the rule-based responder");
        Vec::new()
    } else {
        config
            .models
            .iter()
            .map(|model| {
                GeminiBackend::new(config, model.as_str())
                    .map(|b| Arc::new(b) as Arc<dyn GenerativeBackend>)
            })
            .collect::<Result<_, _>>()?
    };

    tracing::info!(
        models = ?config.models,
        active = backends.len(),
        deadline_secs = config.answer_deadline_secs,
        "Generative responder ready"
    );

    Ok(GenerativeResponder::new(backends, RuleBasedResponder::new())
        .with_deadline(Duration::from_secs(config.answer_deadline_secs)))
}
