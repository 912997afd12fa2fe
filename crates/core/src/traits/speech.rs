//! Speech processing traits

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::{AudioInput, Language, Utterance, VoiceGender};

/// Speech-to-Text interface
///
/// Implementations:
/// - `DhruvaRecognizer` - Bhashini inference pipeline (base64 JSON)
/// - `CanvasRecognizer` - legacy Bhashini sandbox (multipart upload)
///
/// A successful result never carries blank text; implementations report
/// that as `CapabilityError::EmptyResult`.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync + 'static {
    async fn recognize(
        &self,
        audio: &AudioInput,
        language: Language,
    ) -> Result<Utterance, CapabilityError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Text-to-Speech interface
///
/// Returns the synthesized audio as base64 so it can be forwarded to the
/// client untouched.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
        gender: VoiceGender,
    ) -> Result<String, CapabilityError>;

    fn name(&self) -> &str;
}
