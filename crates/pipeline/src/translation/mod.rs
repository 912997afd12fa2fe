//! Translation clients
//!
//! All call sites go through `Translator::translate`, which keeps the
//! original text whenever the remote call fails.

mod dhruva;

pub use agrisaarthi_core::NoopTranslator;
pub use dhruva::DhruvaTranslator;

use std::sync::Arc;

use agrisaarthi_config::{BhashiniConfig, TranslationProvider};
use agrisaarthi_core::{CapabilityError, Translator};

/// Create translator based on config
pub fn create_translator(
    config: &BhashiniConfig,
) -> Result<Arc<dyn Translator>, CapabilityError> {
    match config.translation_provider {
        TranslationProvider::Dhruva => {
            tracing::info!("Using Dhruva IndicTrans2 translation");
            Ok(Arc::new(DhruvaTranslator::new(config)?))
        }
        TranslationProvider::Disabled => {
            tracing::info!("Translation disabled, using pass-through");
            Ok(Arc::new(NoopTranslator))
        }
    }
}
