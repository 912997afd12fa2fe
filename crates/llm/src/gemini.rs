//! Google Gemini `generateContent` backend
//!
//! Failures are classified from the HTTP status and the `error.status`
//! field of the error payload. Message heuristics apply only when neither
//! is available (transport errors).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use agrisaarthi_config::GeminiConfig;

use crate::backend::{FailureKind, GenerationError, GenerativeBackend};
use crate::LlmError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Map a status code and/or error payload to a failure kind
pub fn classify(status: Option<u16>, error_status: Option<&str>, message: &str) -> FailureKind {
    match (status, error_status) {
        (Some(429), _) | (_, Some("RESOURCE_EXHAUSTED")) => FailureKind::QuotaExceeded,
        (Some(404), _) | (_, Some("NOT_FOUND")) => FailureKind::NotFound,
        (Some(503), _) | (_, Some("UNAVAILABLE")) => FailureKind::NotFound,
        (None, None) => FailureKind::from_message(message),
        _ => FailureKind::Other,
    }
}

fn error_from_body(status: u16, body: &str) -> GenerationError {
    let api_error = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error);

    let (error_status, message) = match &api_error {
        Some(e) => (
            Some(e.status.as_str()).filter(|s| !s.is_empty()),
            e.message.clone(),
        ),
        None => (None, body.to_string()),
    };
    let status = api_error.as_ref().and_then(|e| e.code).unwrap_or(status);

    GenerationError::new(
        classify(Some(status), error_status, &message),
        format!("HTTP {}: {}", status, message),
    )
}

/// One Gemini model behind the `GenerativeBackend` trait
pub struct GeminiBackend {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    generation: GenerationConfig,
}

impl GeminiBackend {
    pub fn new(config: &GeminiConfig, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: model.into(),
            generation: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                max_output_tokens: config.max_output_tokens,
            },
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn send(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: self.generation.clone(),
        };

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let message = e.to_string();
                GenerationError::new(classify(None, None, &message), message)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::other(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::other(format!("Invalid response: {}", e)))?;

        if let Some(error) = parsed.error {
            let error_status = Some(error.status.as_str()).filter(|s| !s.is_empty());
            return Err(GenerationError::new(
                classify(error.code, error_status, &error.message),
                error.message,
            ));
        }

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::other("No candidate text in response"));
        }
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let start = Instant::now();
        let result = self.send(prompt).await;

        metrics::histogram!("agrisaarthi_capability_latency_seconds", "capability" => "llm")
            .record(start.elapsed().as_secs_f64());
        if result.is_err() {
            metrics::counter!("agrisaarthi_capability_errors_total", "capability" => "llm")
                .increment(1);
        }

        result
    }
}
