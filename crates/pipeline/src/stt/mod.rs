//! Speech recognition clients

mod canvas;
mod dhruva;

pub use canvas::CanvasRecognizer;
pub use dhruva::DhruvaRecognizer;

use std::sync::Arc;

use agrisaarthi_config::{BhashiniConfig, SpeechProvider};
use agrisaarthi_core::{CapabilityError, SpeechRecognizer};

/// Create the configured recognizer
pub fn create_recognizer(
    config: &BhashiniConfig,
) -> Result<Arc<dyn SpeechRecognizer>, CapabilityError> {
    match config.asr_provider {
        SpeechProvider::Dhruva => {
            tracing::info!(url = %config.api_url, "Using Dhruva speech recognition");
            Ok(Arc::new(DhruvaRecognizer::new(config)?))
        }
        SpeechProvider::Canvas => {
            tracing::info!(url = %config.canvas_base_url, "Using legacy sandbox speech recognition");
            Ok(Arc::new(CanvasRecognizer::new(config)?))
        }
    }
}
