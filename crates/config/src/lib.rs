//! Configuration management for the AgriSaarthi gateway
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (AGRISAARTHI_ prefix, `__` section separator)
//! - Well-known credential variables (`GEMINI_API_KEY`, `BHASHINI_API_KEY`, ...)
//!   read by the serde defaults

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, BhashiniConfig, GeminiConfig, ObservabilityConfig, PersistenceConfig,
    PipelineConfig, RuntimeEnvironment, ServerConfig, Settings, SpeechProvider,
    TranslationProvider, WeatherConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::MissingField(key),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}
