//! Error types shared by the capability clients

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single remote capability call (ASR, MT, TTS, OCR, weather)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty result from {0}")]
    EmptyResult(&'static str),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CapabilityError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<reqwest::Error> for CapabilityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CapabilityError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl From<base64::DecodeError> for CapabilityError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidInput(format!("invalid base64: {}", err))
    }
}

/// Core error
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}
