//! AgriSaarthi Gateway Server
//!
//! Thin HTTP handlers over the pipeline orchestrator, the capability
//! clients and the persistence layer.

pub mod bhashini;
pub mod bot;
pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_error, record_request};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use agrisaarthi_core::{CapabilityError, Language};
use agrisaarthi_pipeline::{DocumentFlowError, VoiceFlowError};

/// Server errors; the message is sent to the client as `{"error": ...}`
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Capability(String),

    #[error("{0}")]
    Persistence(String),

    #[error("{0}")]
    Configuration(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Capability(_)
            | ServerError::Persistence(_)
            | ServerError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => "invalid_request",
            ServerError::Capability(_) => "capability",
            ServerError::Persistence(_) => "persistence",
            ServerError::Configuration(_) => "configuration",
        }
    }

    /// Map a capability failure, keeping client mistakes as 400
    pub fn from_capability(err: &CapabilityError, message: &str) -> Self {
        match err {
            CapabilityError::PayloadTooLarge { .. } | CapabilityError::InvalidInput(_) => {
                ServerError::InvalidRequest(err.to_string())
            }
            _ => ServerError::Capability(message.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::debug!(kind = self.kind(), error = %self, "Request rejected");
        }
        record_error(self.kind());
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<VoiceFlowError> for ServerError {
    fn from(err: VoiceFlowError) -> Self {
        match &err {
            VoiceFlowError::RecognitionFailed(source) => {
                ServerError::from_capability(source, &err.to_string())
            }
        }
    }
}

impl From<DocumentFlowError> for ServerError {
    fn from(err: DocumentFlowError) -> Self {
        match &err {
            DocumentFlowError::ExtractionFailed(source) => {
                ServerError::from_capability(source, &err.to_string())
            }
        }
    }
}

/// Resolve an optional language code; blank means `default`
pub fn parse_language(code: Option<&str>, default: Language) -> Result<Language, ServerError> {
    match code.map(str::trim) {
        None | Some("") => Ok(default),
        Some(code) => Language::from_str_loose(code)
            .ok_or_else(|| ServerError::InvalidRequest(format!("Unsupported language: {}", code))),
    }
}
