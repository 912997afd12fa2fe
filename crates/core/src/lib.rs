//! Core traits and types for the AgriSaarthi gateway
//!
//! This crate provides foundational types used across all other crates:
//! - Capability traits for pluggable remote services (ASR, MT, TTS, OCR, LLM, weather)
//! - Language definitions for the Bhashini languages
//! - Audio payload and utterance types
//! - Error types

pub mod audio;
pub mod error;
pub mod language;
pub mod traits;
pub mod utterance;

pub use audio::{AudioFormat, AudioInput};
pub use error::{CapabilityError, Error, Result};
pub use language::{Language, LanguageFamily};
pub use utterance::{Utterance, VoiceGender};

pub use traits::{
    Answer, AnswerSource, AttemptOutcome, BackendAttempt, NoopTranslator, Responder,
    SpeechRecognizer, SpeechSynthesizer, TextExtractor, Translator, WeatherProvider,
    WeatherReport,
};
