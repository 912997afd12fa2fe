//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use agrisaarthi_core::{AudioFormat, Language, VoiceGender};

use crate::constants::{audio, endpoints, generation, memory, timeouts};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Relaxed validation, permissive CORS
    #[default]
    Development,
    Staging,
    /// All validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Bhashini speech/translation/OCR services
    #[serde(default)]
    pub bhashini: BhashiniConfig,

    /// Generative language backends
    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    /// Message and profile store
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Language routing for the flows
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,

    /// Restrict CORS to `cors_origins` (permissive when false)
    #[serde(default)]
    pub cors_enabled: bool,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Service name reported by `/health`
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_request_timeout() -> u64 {
    timeouts::REQUEST_SECS
}
fn default_service_name() -> String {
    "agrisaarthi-gateway".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_request_timeout(),
            cors_enabled: false,
            cors_origins: Vec::new(),
            service_name: default_service_name(),
        }
    }
}

/// Which speech recognition API to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    /// Dhruva inference pipeline, base64 JSON
    #[default]
    Dhruva,
    /// Legacy sandbox API, multipart upload
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    #[default]
    Dhruva,
    /// Pass-through
    Disabled,
}

/// Bhashini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BhashiniConfig {
    #[serde(default = "default_bhashini_api_url")]
    pub api_url: String,

    /// Dhruva `Authorization` header value
    #[serde(default = "default_bhashini_api_key")]
    pub api_key: String,

    #[serde(default = "default_canvas_base_url")]
    pub canvas_base_url: String,

    /// Canvas `access-token` header value
    #[serde(default = "default_canvas_access_token")]
    pub canvas_access_token: String,

    #[serde(default)]
    pub asr_provider: SpeechProvider,

    #[serde(default)]
    pub translation_provider: TranslationProvider,

    #[serde(default = "default_capability_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub asr_audio_format: AudioFormat,

    #[serde(default = "default_asr_sampling_rate")]
    pub asr_sampling_rate: u32,

    #[serde(default = "default_tts_sampling_rate")]
    pub tts_sampling_rate: u32,

    /// Uploads above this size are rejected before any remote call
    #[serde(default = "default_max_audio_bytes")]
    pub max_audio_bytes: usize,

    #[serde(default)]
    pub default_gender: VoiceGender,
}

fn default_bhashini_api_url() -> String {
    std::env::var("BHASHINI_API_URL").unwrap_or_else(|_| endpoints::BHASHINI_PIPELINE.to_string())
}
fn default_bhashini_api_key() -> String {
    std::env::var("BHASHINI_API_KEY").unwrap_or_default()
}
fn default_canvas_base_url() -> String {
    std::env::var("BHASHINI_BASE_URL")
        .unwrap_or_else(|_| endpoints::BHASHINI_CANVAS_BASE.to_string())
}
fn default_canvas_access_token() -> String {
    std::env::var("BHASHINI_CANVAS_TOKEN").unwrap_or_default()
}
fn default_capability_timeout() -> u64 {
    timeouts::CAPABILITY_SECS
}
fn default_asr_sampling_rate() -> u32 {
    audio::ASR_SAMPLING_RATE
}
fn default_tts_sampling_rate() -> u32 {
    audio::TTS_SAMPLING_RATE
}
fn default_max_audio_bytes() -> usize {
    audio::MAX_AUDIO_BYTES
}

impl Default for BhashiniConfig {
    fn default() -> Self {
        Self {
            api_url: default_bhashini_api_url(),
            api_key: default_bhashini_api_key(),
            canvas_base_url: default_canvas_base_url(),
            canvas_access_token: default_canvas_access_token(),
            asr_provider: SpeechProvider::default(),
            translation_provider: TranslationProvider::default(),
            timeout_secs: default_capability_timeout(),
            asr_audio_format: AudioFormat::default(),
            asr_sampling_rate: default_asr_sampling_rate(),
            tts_sampling_rate: default_tts_sampling_rate(),
            max_audio_bytes: default_max_audio_bytes(),
            default_gender: VoiceGender::default(),
        }
    }
}

/// Gemini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_api_key")]
    pub api_key: String,

    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    /// Ordered model list; each is tried once per question
    #[serde(default = "default_gemini_models")]
    pub models: Vec<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-model request timeout
    #[serde(default = "default_capability_timeout")]
    pub timeout_secs: u64,

    /// Budget for the whole ordered walk; the rule-based answer is used
    /// once it runs out
    #[serde(default = "default_answer_deadline")]
    pub answer_deadline_secs: u64,
}

fn default_answer_deadline() -> u64 {
    timeouts::ANSWER_DEADLINE_SECS
}
fn default_gemini_api_key() -> String {
    std::env::var("GEMINI_API_KEY").unwrap_or_default()
}
fn default_gemini_endpoint() -> String {
    endpoints::GEMINI_API_BASE.to_string()
}
fn default_gemini_models() -> Vec<String> {
    generation::DEFAULT_MODELS
        .iter()
        .map(|m| m.to_string())
        .collect()
}
fn default_temperature() -> f32 {
    generation::TEMPERATURE
}
fn default_top_p() -> f32 {
    generation::TOP_P
}
fn default_top_k() -> u32 {
    generation::TOP_K
}
fn default_max_output_tokens() -> u32 {
    generation::MAX_OUTPUT_TOKENS
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: default_gemini_api_key(),
            endpoint: default_gemini_endpoint(),
            models: default_gemini_models(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_capability_timeout(),
            answer_deadline_secs: default_answer_deadline(),
        }
    }
}

/// WeatherAPI.com configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_api_key")]
    pub api_key: String,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

fn default_weather_api_key() -> String {
    std::env::var("WEATHER_API_KEY").unwrap_or_default()
}
fn default_weather_base_url() -> String {
    endpoints::WEATHER_API_BASE.to_string()
}
fn default_weather_timeout() -> u64 {
    timeouts::WEATHER_SECS
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_weather_api_key(),
            base_url: default_weather_base_url(),
            timeout_secs: default_weather_timeout(),
        }
    }
}

/// Persistence configuration (Supabase PostgREST)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Use Supabase (false = in-memory only)
    #[serde(default = "default_persistence_enabled")]
    pub enabled: bool,

    #[serde(default = "default_supabase_url")]
    pub supabase_url: String,

    #[serde(default = "default_supabase_key")]
    pub supabase_key: String,

    #[serde(default = "default_capability_timeout")]
    pub timeout_secs: u64,

    /// Most recent bot replies kept by the in-memory store
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,
}

fn default_memory_capacity() -> usize {
    memory::MESSAGE_CAPACITY
}
fn default_supabase_url() -> String {
    std::env::var("SUPABASE_URL").unwrap_or_default()
}
fn default_supabase_key() -> String {
    std::env::var("SUPABASE_ANON_KEY").unwrap_or_default()
}
fn default_persistence_enabled() -> bool {
    !default_supabase_url().is_empty()
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_persistence_enabled(),
            supabase_url: default_supabase_url(),
            supabase_key: default_supabase_key(),
            timeout_secs: default_capability_timeout(),
            memory_capacity: default_memory_capacity(),
        }
    }
}

/// Language routing for the text, voice and document flows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Language the generative backends and rule-based answers use
    #[serde(default = "default_working_language")]
    pub working_language: String,

    #[serde(default = "default_source_language")]
    pub default_source_language: String,

    #[serde(default = "default_target_language")]
    pub default_target_language: String,

    /// Used when a profile has no (or an unknown) preferred language
    #[serde(default = "default_profile_language")]
    pub default_profile_language: String,
}

fn default_working_language() -> String {
    "en".to_string()
}
fn default_source_language() -> String {
    "en".to_string()
}
fn default_target_language() -> String {
    "hi".to_string()
}
fn default_profile_language() -> String {
    crate::constants::bot::DEFAULT_LANGUAGE.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            working_language: default_working_language(),
            default_source_language: default_source_language(),
            default_target_language: default_target_language(),
            default_profile_language: default_profile_language(),
        }
    }
}

impl PipelineConfig {
    pub fn working(&self) -> Language {
        Language::from_str_loose(&self.working_language).unwrap_or_default()
    }

    pub fn source(&self) -> Language {
        Language::from_str_loose(&self.default_source_language).unwrap_or(Language::English)
    }

    pub fn target(&self) -> Language {
        Language::from_str_loose(&self.default_target_language).unwrap_or(Language::Hindi)
    }

    pub fn profile_language(&self) -> Language {
        Language::from_str_loose(&self.default_profile_language).unwrap_or_default()
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,

    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_timeouts()?;
        self.validate_gemini()?;
        self.validate_pipeline()?;
        self.validate_persistence()?;
        self.warn_missing_credentials();
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.cors_enabled && self.server.cors_origins.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.cors_origins".to_string(),
                message: "CORS is enabled but no origins are configured".to_string(),
            });
        }

        if self.environment.is_strict() && !self.server.cors_enabled {
            return Err(ConfigError::InvalidValue {
                field: "server.cors_enabled".to_string(),
                message: format!(
                    "Permissive CORS is not allowed in {:?}",
                    self.environment
                ),
            });
        }

        Ok(())
    }

    fn validate_timeouts(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("server.timeout_seconds", self.server.timeout_seconds),
            ("bhashini.timeout_secs", self.bhashini.timeout_secs),
            ("gemini.timeout_secs", self.gemini.timeout_secs),
            ("gemini.answer_deadline_secs", self.gemini.answer_deadline_secs),
            ("weather.timeout_secs", self.weather.timeout_secs),
            ("persistence.timeout_secs", self.persistence.timeout_secs),
        ];

        for (field, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Timeout must be at least 1 second".to_string(),
                });
            }
        }

        // Voice flow: recognition, two translations, the answer walk, synthesis
        let worst_flow = 4 * self.bhashini.timeout_secs + self.gemini.answer_deadline_secs;
        if self.server.timeout_seconds <= worst_flow {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: format!(
                    "Must exceed the slowest flow ({}s = 4 x bhashini.timeout_secs + gemini.answer_deadline_secs)",
                    worst_flow
                ),
            });
        }

        if self.bhashini.max_audio_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bhashini.max_audio_bytes".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    fn validate_gemini(&self) -> Result<(), ConfigError> {
        if self.gemini.models.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "gemini.models".to_string(),
                message: "At least one model must be configured".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "gemini.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.gemini.temperature),
            });
        }

        if !(0.0..=1.0).contains(&self.gemini.top_p) {
            return Err(ConfigError::InvalidValue {
                field: "gemini.top_p".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", self.gemini.top_p),
            });
        }

        Ok(())
    }

    fn validate_pipeline(&self) -> Result<(), ConfigError> {
        let languages = [
            ("pipeline.working_language", &self.pipeline.working_language),
            (
                "pipeline.default_source_language",
                &self.pipeline.default_source_language,
            ),
            (
                "pipeline.default_target_language",
                &self.pipeline.default_target_language,
            ),
            (
                "pipeline.default_profile_language",
                &self.pipeline.default_profile_language,
            ),
        ];

        for (field, value) in languages {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
            if Language::from_str_loose(value).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("Unsupported language: {}", value),
                });
            }
        }

        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        if self.persistence.enabled && self.persistence.supabase_url.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "persistence.supabase_url".to_string(),
            ));
        }
        if self.persistence.memory_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "persistence.memory_capacity".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    fn warn_missing_credentials(&self) {
        let credentials = [
            ("bhashini.api_key", &self.bhashini.api_key),
            ("gemini.api_key", &self.gemini.api_key),
            ("weather.api_key", &self.weather.api_key),
        ];

        for (field, value) in credentials {
            if value.is_empty() {
                tracing::warn!(field, "Credential not configured; calls will fail and fall back");
            }
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (AGRISAARTHI_ prefix, `__` separator)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("AGRISAARTHI")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
