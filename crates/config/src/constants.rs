//! Centralized constants for the gateway
//!
//! Default endpoints, service ids and tuning values referenced by the
//! settings defaults and the capability clients.

/// Remote service endpoints
pub mod endpoints {
    /// Bhashini Dhruva inference pipeline
    pub const BHASHINI_PIPELINE: &str =
        "https://dhruva-api.bhashini.gov.in/services/inference/pipeline";

    /// Legacy Bhashini sandbox (canvas) API base
    pub const BHASHINI_CANVAS_BASE: &str = "https://canvas.iiit.ac.in";

    /// Gemini REST API base
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// WeatherAPI.com REST base
    pub const WEATHER_API_BASE: &str = "https://api.weatherapi.com/v1";
}

/// Dhruva model service ids
pub mod service_ids {
    pub const ASR_ENGLISH: &str = "ai4bharat/whisper-medium-en--gpu--t4";
    pub const ASR_INDO_ARYAN: &str = "ai4bharat/conformer-multilingual-indo_aryan-gpu--t4";
    pub const ASR_DRAVIDIAN: &str = "ai4bharat/conformer-multilingual-dravidian-gpu--t4";

    pub const TRANSLATION: &str = "ai4bharat/indictrans-v2-all-gpu--t4";

    pub const TTS_MISC: &str = "ai4bharat/indic-tts-coqui-misc-gpu--t4";
    pub const TTS_INDO_ARYAN: &str = "ai4bharat/indic-tts-coqui-indo_aryan-gpu--t4";
    pub const TTS_DRAVIDIAN: &str = "ai4bharat/indic-tts-coqui-dravidian-gpu--t4";
}

/// Timeouts (seconds)
pub mod timeouts {
    pub const CAPABILITY_SECS: u64 = 30;
    pub const WEATHER_SECS: u64 = 10;
    /// Whole answer walk across all generative backends
    pub const ANSWER_DEADLINE_SECS: u64 = 40;
    pub const REQUEST_SECS: u64 = 180;
}

/// In-memory persistence
pub mod memory {
    /// Bot replies retained when Supabase is not configured
    pub const MESSAGE_CAPACITY: usize = 1000;
}

/// Audio defaults
pub mod audio {
    pub const ASR_SAMPLING_RATE: u32 = 16000;
    pub const TTS_SAMPLING_RATE: u32 = 8000;
    /// 10 MiB
    pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;
}

/// Gemini generation defaults
pub mod generation {
    pub const TEMPERATURE: f32 = 0.7;
    pub const TOP_P: f32 = 0.9;
    pub const TOP_K: u32 = 40;
    pub const MAX_OUTPUT_TOKENS: u32 = 2048;

    /// Tried in this order until one answers
    pub const DEFAULT_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"];
}

/// Identifiers used when writing bot replies
pub mod bot {
    pub const SENDER_ID: &str = "bot-agrisaarthi";
    pub const MESSAGE_TYPE: &str = "text";
    pub const DEFAULT_LANGUAGE: &str = "en";
}
