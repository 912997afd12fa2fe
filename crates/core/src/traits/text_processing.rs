//! Text processing traits

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::Language;

/// Translation interface
///
/// Implementations provide `try_translate`; callers use `translate`, which
/// never fails: identity pairs and blank text skip the remote call, and any
/// error or empty result yields the original text.
///
/// # Example
///
/// ```ignore
/// let english = translator
///     .translate("धान कैसे उगाएं", Language::Hindi, Language::English)
///     .await;
/// ```
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Single remote translation call
    async fn try_translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, CapabilityError>;

    fn name(&self) -> &str;

    async fn translate(&self, text: &str, source: Language, target: Language) -> String {
        if source == target || text.trim().is_empty() {
            return text.to_string();
        }

        match self.try_translate(text, source, target).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => {
                tracing::warn!(
                    translator = self.name(),
                    source = %source,
                    target = %target,
                    "Empty translation, keeping original text"
                );
                text.to_string()
            }
            Err(e) => {
                tracing::warn!(
                    translator = self.name(),
                    source = %source,
                    target = %target,
                    error = %e,
                    "Translation failed, keeping original text"
                );
                text.to_string()
            }
        }
    }
}

/// Pass-through translator used when translation is disabled
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn try_translate(
        &self,
        text: &str,
        _source: Language,
        _target: Language,
    ) -> Result<String, CapabilityError> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Document text extraction (OCR)
#[async_trait]
pub trait TextExtractor: Send + Sync + 'static {
    async fn extract_text(
        &self,
        image: &[u8],
        language: Language,
    ) -> Result<String, CapabilityError>;

    fn name(&self) -> &str;
}
