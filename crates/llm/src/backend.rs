//! Generative backend trait and failure taxonomy

use async_trait::async_trait;
use thiserror::Error;

use agrisaarthi_core::AttemptOutcome;

/// Why a backend produced no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    QuotaExceeded,
    /// Model missing or temporarily unavailable
    NotFound,
    Other,
}

impl FailureKind {
    /// Fallback for errors with no status code or error payload
    pub fn from_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("quota") || lowered.contains("rate limit") {
            Self::QuotaExceeded
        } else if lowered.contains("not found") {
            Self::NotFound
        } else {
            Self::Other
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct GenerationError {
    pub kind: FailureKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Other, message)
    }

    pub fn outcome(&self) -> AttemptOutcome {
        match self.kind {
            FailureKind::QuotaExceeded => AttemptOutcome::QuotaExceeded(self.message.clone()),
            FailureKind::NotFound => AttemptOutcome::NotFound(self.message.clone()),
            FailureKind::Other => AttemptOutcome::OtherError(self.message.clone()),
        }
    }
}

/// One text generation model
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Stable identifier, e.g. `gemini-1.5-flash`
    fn id(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
