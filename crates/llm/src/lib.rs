//! Generative answering with ordered backend fallback
//!
//! Features:
//! - Gemini `generateContent` backend with structured failure classification
//! - Ordered model list, each tried once per question
//! - Rule-based advisory as the last resort, so an answer always exists

pub mod backend;
pub mod factory;
pub mod gemini;
pub mod prompt;
pub mod responder;

pub use backend::{FailureKind, GenerationError, GenerativeBackend};
pub use factory::create_responder;
pub use gemini::GeminiBackend;
pub use prompt::chat_prompt;
pub use responder::GenerativeResponder;

use thiserror::Error;

/// LLM setup errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}
