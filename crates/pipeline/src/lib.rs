//! Capability clients and flow orchestration
//!
//! Features:
//! - Bhashini Dhruva pipeline (ASR, translation, TTS)
//! - Legacy Bhashini sandbox (multipart ASR, OCR)
//! - WeatherAPI.com current conditions
//! - Text, voice, document and weather flows over the capability traits

pub mod dhruva;
pub mod fetch;
mod http;
pub mod ocr;
pub mod orchestrator;
pub mod stt;
pub mod translation;
pub mod tts;
pub mod weather;

pub use dhruva::{DhruvaClient, TaskType};
pub use fetch::AudioFetcher;
pub use ocr::CanvasOcr;
pub use orchestrator::{
    Capabilities, DocumentFlowError, DocumentResult, Orchestrator, TextResult, VoiceFlowError,
    VoiceRequest, VoiceResult, VoiceState,
};
pub use stt::{create_recognizer, CanvasRecognizer, DhruvaRecognizer};
pub use translation::{create_translator, DhruvaTranslator, NoopTranslator};
pub use tts::DhruvaSynthesizer;
pub use weather::WeatherApiClient;
