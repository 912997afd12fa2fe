//! Answer generation trait and the record of how an answer was produced

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of one generative backend try
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success(String),
    QuotaExceeded(String),
    NotFound(String),
    OtherError(String),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Label used for metrics and logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::NotFound(_) => "not_found",
            Self::OtherError(_) => "other_error",
        }
    }
}

/// One entry in the ordered backend list, as tried for a single question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendAttempt {
    pub backend: String,
    pub ordinal: usize,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Backend(String),
    RuleBased,
}

/// Final answer to a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
    pub attempts: Vec<BackendAttempt>,
}

impl Answer {
    pub fn is_fallback(&self) -> bool {
        self.source == AnswerSource::RuleBased
    }
}

/// Produces an answer for a farmer's question in the working language
///
/// `answer` must always return non-empty text. `complete` runs a caller-built
/// prompt and returns `None` when no backend produced text.
#[async_trait]
pub trait Responder: Send + Sync + 'static {
    async fn answer(&self, question: &str) -> Answer;

    async fn complete(&self, prompt: &str) -> Option<String>;
}
