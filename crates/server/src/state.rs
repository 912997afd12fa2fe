//! Application State
//!
//! Built once from `Settings` and shared read-only across handlers.

use std::sync::Arc;

use agrisaarthi_config::Settings;
use agrisaarthi_llm::create_responder;
use agrisaarthi_persistence::PersistenceLayer;
use agrisaarthi_pipeline::{
    create_recognizer, create_translator, AudioFetcher, CanvasOcr, Capabilities,
    DhruvaSynthesizer, Orchestrator, WeatherApiClient,
};

use crate::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub orchestrator: Arc<Orchestrator>,
    pub persistence: PersistenceLayer,
    pub audio_fetcher: Arc<AudioFetcher>,
}

impl AppState {
    pub fn new(
        config: Settings,
        orchestrator: Orchestrator,
        persistence: PersistenceLayer,
        audio_fetcher: AudioFetcher,
    ) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            persistence,
            audio_fetcher: Arc::new(audio_fetcher),
        }
    }

    /// Wire every capability client from configuration
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let bhashini = &config.bhashini;

        let capabilities = Capabilities {
            recognizer: create_recognizer(bhashini).map_err(configuration)?,
            translator: create_translator(bhashini).map_err(configuration)?,
            synthesizer: Arc::new(DhruvaSynthesizer::new(bhashini).map_err(configuration)?),
            extractor: Arc::new(CanvasOcr::new(bhashini).map_err(configuration)?),
            weather: Arc::new(WeatherApiClient::new(&config.weather).map_err(configuration)?),
            responder: Arc::new(create_responder(&config.gemini).map_err(configuration)?),
        };

        let orchestrator = Orchestrator::new(
            capabilities,
            config.pipeline.working(),
            bhashini.default_gender,
        );
        let persistence =
            agrisaarthi_persistence::init(&config.persistence).map_err(configuration)?;
        let audio_fetcher = AudioFetcher::new(bhashini.timeout_secs, bhashini.max_audio_bytes)
            .map_err(configuration)?;

        Ok(Self::new(config, orchestrator, persistence, audio_fetcher))
    }
}

fn configuration(err: impl std::fmt::Display) -> ServerError {
    ServerError::Configuration(err.to_string())
}
