//! Responder that walks the ordered backend list
//!
//! Each backend is tried once, in order. The first non-empty answer wins;
//! every failure kind moves on to the next backend. The whole walk shares one
//! deadline: a call still running when it expires is abandoned and the
//! remaining backends are skipped. When the list is exhausted `answer` falls
//! back to the rule-based advisory and `complete` returns `None`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use agrisaarthi_advisory::RuleBasedResponder;
use agrisaarthi_config::constants::timeouts::ANSWER_DEADLINE_SECS;
use agrisaarthi_core::{Answer, AnswerSource, AttemptOutcome, BackendAttempt, Responder};

use crate::backend::{GenerationError, GenerativeBackend};
use crate::prompt::chat_prompt;

pub struct GenerativeResponder {
    backends: Vec<Arc<dyn GenerativeBackend>>,
    fallback: RuleBasedResponder,
    deadline: Duration,
}

struct Generated {
    backend: String,
    text: String,
}

impl GenerativeResponder {
    pub fn new(backends: Vec<Arc<dyn GenerativeBackend>>, fallback: RuleBasedResponder) -> Self {
        Self {
            backends,
            fallback,
            deadline: Duration::from_secs(ANSWER_DEADLINE_SECS),
        }
    }

    /// Budget for one full walk over the backends
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.id()).collect()
    }

    async fn run(&self, prompt: &str) -> (Option<Generated>, Vec<BackendAttempt>) {
        let mut attempts = Vec::with_capacity(self.backends.len());
        let walk_start = Instant::now();

        for (ordinal, backend) in self.backends.iter().enumerate() {
            let remaining = self.deadline.saturating_sub(walk_start.elapsed());
            if remaining.is_zero() {
                tracing::warn!(
                    skipped = self.backends.len() - ordinal,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Answer deadline reached, skipping remaining backends"
                );
                break;
            }

            let start = Instant::now();
            let result = match tokio::time::timeout(remaining, backend.generate(prompt)).await {
                Ok(Ok(text)) if text.trim().is_empty() => {
                    Err(GenerationError::other("Empty response text"))
                }
                Ok(other) => other,
                Err(_) => Err(GenerationError::other(format!(
                    "Answer deadline of {}ms exceeded",
                    self.deadline.as_millis()
                ))),
            };

            let outcome = match &result {
                Ok(text) => AttemptOutcome::Success(format!("{} chars", text.chars().count())),
                Err(e) => e.outcome(),
            };

            metrics::counter!(
                "agrisaarthi_llm_attempts_total",
                "backend" => backend.id().to_string(),
                "outcome" => outcome.label()
            )
            .increment(1);

            match &result {
                Ok(_) => tracing::info!(
                    backend = %backend.id(),
                    ordinal,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Generative backend answered"
                ),
                Err(e) => tracing::warn!(
                    backend = %backend.id(),
                    ordinal,
                    outcome = outcome.label(),
                    error = %e.message,
                    "Generative backend failed, trying next"
                ),
            }

            attempts.push(BackendAttempt {
                backend: backend.id().to_string(),
                ordinal,
                outcome,
            });

            if let Ok(text) = result {
                return (
                    Some(Generated {
                        backend: backend.id().to_string(),
                        text,
                    }),
                    attempts,
                );
            }
        }

        (None, attempts)
    }
}

#[async_trait]
impl Responder for GenerativeResponder {
    async fn answer(&self, question: &str) -> Answer {
        let (generated, attempts) = self.run(&chat_prompt(question)).await;

        match generated {
            Some(Generated { backend, text }) => Answer {
                text,
                source: AnswerSource::Backend(backend),
                attempts,
            },
            None => {
                let advice = self.fallback.advise(question);
                metrics::counter!("agrisaarthi_fallback_used_total", "category" => advice.category.as_str())
                    .increment(1);
                tracing::info!(
                    attempts = attempts.len(),
                    category = advice.category.as_str(),
                    "All generative backends failed, using rule-based answer"
                );
                Answer {
                    text: advice.text.to_string(),
                    source: AnswerSource::RuleBased,
                    attempts,
                }
            }
        }
    }

    async fn complete(&self, prompt: &str) -> Option<String> {
        let (generated, _) = self.run(prompt).await;
        generated.map(|g| g.text)
    }
}
