//! Pipeline Orchestrator
//!
//! Sequences the capability clients into the gateway's flows:
//! - text: translate to working language, answer, translate back
//! - voice: an explicit linear state machine from audio to synthesized answer
//! - document: OCR, translation and canned analysis
//! - weather: current conditions turned into an advisory message
//!
//! Every step is fail-soft except speech recognition (voice flow) and text
//! extraction (document flow), which abort with a typed error.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use agrisaarthi_advisory::weather::{
    invalid_weather_data, WEATHER_SERVICE_DOWN, WEATHER_UNAVAILABLE_FOR_LOCATION,
};
use agrisaarthi_advisory::{advisory_prompt, analyze_document, basic_advisory, format_weather_message};
use agrisaarthi_core::{
    Answer, AnswerSource, AudioInput, CapabilityError, Language, Responder, SpeechRecognizer,
    SpeechSynthesizer, TextExtractor, Translator, Utterance, VoiceGender, WeatherProvider,
};

/// Voice flow failure surfaced to the caller
#[derive(Error, Debug)]
pub enum VoiceFlowError {
    #[error("Speech recognition failed")]
    RecognitionFailed(#[source] CapabilityError),
}

/// Document flow failure surfaced to the caller
#[derive(Error, Debug)]
pub enum DocumentFlowError {
    #[error("Text extraction failed")]
    ExtractionFailed(#[source] CapabilityError),
}

/// The capability implementations a flow runs against
#[derive(Clone)]
pub struct Capabilities {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub extractor: Arc<dyn TextExtractor>,
    pub weather: Arc<dyn WeatherProvider>,
    pub responder: Arc<dyn Responder>,
}

/// Text flow output
#[derive(Debug, Clone)]
pub struct TextResult {
    /// Answer in the caller's language
    pub reply: String,
    pub answer: Answer,
}

/// Voice flow input
#[derive(Debug, Clone)]
pub struct VoiceRequest {
    pub audio: AudioInput,
    pub source: Language,
    pub target: Language,
    pub gender: Option<VoiceGender>,
}

/// Aggregate voice flow output
#[derive(Debug, Clone, Serialize)]
pub struct VoiceResult {
    pub recognized_text: String,
    pub recognized_language: Language,
    pub question_in_working: String,
    pub answer_in_working: String,
    pub answer_translated: String,
    pub answer_language: Language,
    pub answer_source: AnswerSource,
    pub audio_content: Option<String>,
}

/// Voice flow states, in order. Each variant carries what later states need.
#[derive(Debug)]
pub enum VoiceState {
    Received(AudioInput),
    Recognized(Utterance),
    TranslatedToWorking {
        recognized: Utterance,
        question: String,
    },
    Answered {
        recognized: Utterance,
        question: String,
        answer: Answer,
    },
    TranslatedToTarget {
        recognized: Utterance,
        question: String,
        answer: Answer,
        translated: String,
    },
    Synthesized(VoiceResult),
    Done(VoiceResult),
}

impl VoiceState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Received(_) => "received",
            Self::Recognized(_) => "recognized",
            Self::TranslatedToWorking { .. } => "translated_to_working",
            Self::Answered { .. } => "answered",
            Self::TranslatedToTarget { .. } => "translated_to_target",
            Self::Synthesized(_) => "synthesized",
            Self::Done(_) => "done",
        }
    }
}

/// Document flow output
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub extracted_text: String,
    pub translated_text: String,
    pub analysis: String,
}

/// Runs the flows; holds no per-request state
#[derive(Clone)]
pub struct Orchestrator {
    capabilities: Capabilities,
    working_language: Language,
    default_gender: VoiceGender,
}

impl Orchestrator {
    pub fn new(
        capabilities: Capabilities,
        working_language: Language,
        default_gender: VoiceGender,
    ) -> Self {
        Self {
            capabilities,
            working_language,
            default_gender,
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn working_language(&self) -> Language {
        self.working_language
    }

    pub fn default_gender(&self) -> VoiceGender {
        self.default_gender
    }

    /// Answer `text` written in `language`, replying in the same language
    pub async fn text_flow(&self, text: &str, language: Language) -> TextResult {
        let start = Instant::now();
        let caps = &self.capabilities;

        let question = caps
            .translator
            .translate(text, language, self.working_language)
            .await;
        let answer = caps.responder.answer(&question).await;
        let reply = caps
            .translator
            .translate(&answer.text, self.working_language, language)
            .await;

        record_flow("text", "success", start);
        tracing::info!(
            language = %language,
            fallback = answer.is_fallback(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Text flow completed"
        );

        TextResult { reply, answer }
    }

    /// Run the voice state machine to completion
    pub async fn voice_flow(&self, request: VoiceRequest) -> Result<VoiceResult, VoiceFlowError> {
        let start = Instant::now();
        let VoiceRequest {
            audio,
            source,
            target,
            gender,
        } = request;
        let gender = gender.unwrap_or(self.default_gender);

        let mut state = VoiceState::Received(audio);
        loop {
            let from = state.name();
            state = match state {
                VoiceState::Done(result) => {
                    record_flow("voice", "success", start);
                    tracing::info!(
                        source = %source,
                        target = %target,
                        audio = result.audio_content.is_some(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Voice flow completed"
                    );
                    return Ok(result);
                }
                VoiceState::Received(audio) => match self.recognize(&audio, source).await {
                    Ok(next) => next,
                    Err(e) => {
                        record_flow("voice", "recognition_failed", start);
                        return Err(e);
                    }
                },
                VoiceState::Recognized(recognized) => self.translate_to_working(recognized).await,
                VoiceState::TranslatedToWorking {
                    recognized,
                    question,
                } => self.answer(recognized, question).await,
                VoiceState::Answered {
                    recognized,
                    question,
                    answer,
                } => {
                    self.translate_to_target(recognized, question, answer, target)
                        .await
                }
                VoiceState::TranslatedToTarget {
                    recognized,
                    question,
                    answer,
                    translated,
                } => {
                    self.synthesize(recognized, question, answer, translated, target, gender)
                        .await
                }
                VoiceState::Synthesized(result) => VoiceState::Done(result),
            };
            tracing::debug!(from, to = state.name(), "Voice flow transition");
        }
    }

    // Received -> Recognized. The only aborting transition.
    async fn recognize(
        &self,
        audio: &AudioInput,
        source: Language,
    ) -> Result<VoiceState, VoiceFlowError> {
        match self.capabilities.recognizer.recognize(audio, source).await {
            Ok(utterance) if !utterance.is_blank() => Ok(VoiceState::Recognized(utterance)),
            Ok(_) => Err(VoiceFlowError::RecognitionFailed(CapabilityError::EmptyResult(
                "asr",
            ))),
            Err(e) => {
                tracing::warn!(
                    recognizer = self.capabilities.recognizer.name(),
                    error = %e,
                    "Speech recognition failed"
                );
                Err(VoiceFlowError::RecognitionFailed(e))
            }
        }
    }

    async fn translate_to_working(&self, recognized: Utterance) -> VoiceState {
        let question = if recognized.language == self.working_language {
            recognized.text.clone()
        } else {
            self.capabilities
                .translator
                .translate(&recognized.text, recognized.language, self.working_language)
                .await
        };
        VoiceState::TranslatedToWorking {
            recognized,
            question,
        }
    }

    async fn answer(&self, recognized: Utterance, question: String) -> VoiceState {
        let answer = self.capabilities.responder.answer(&question).await;
        VoiceState::Answered {
            recognized,
            question,
            answer,
        }
    }

    async fn translate_to_target(
        &self,
        recognized: Utterance,
        question: String,
        answer: Answer,
        target: Language,
    ) -> VoiceState {
        let translated = if target == self.working_language {
            answer.text.clone()
        } else {
            self.capabilities
                .translator
                .translate(&answer.text, self.working_language, target)
                .await
        };
        VoiceState::TranslatedToTarget {
            recognized,
            question,
            answer,
            translated,
        }
    }

    // Fail-soft: a synthesis error leaves `audio_content` empty.
    async fn synthesize(
        &self,
        recognized: Utterance,
        question: String,
        answer: Answer,
        translated: String,
        target: Language,
        gender: VoiceGender,
    ) -> VoiceState {
        let audio_content = match self
            .capabilities
            .synthesizer
            .synthesize(&translated, target, gender)
            .await
        {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!(
                    synthesizer = self.capabilities.synthesizer.name(),
                    language = %target,
                    error = %e,
                    "Speech synthesis failed, returning text only"
                );
                None
            }
        };

        VoiceState::Synthesized(VoiceResult {
            recognized_text: recognized.text,
            recognized_language: recognized.language,
            question_in_working: question,
            answer_in_working: answer.text,
            answer_translated: translated,
            answer_language: target,
            answer_source: answer.source,
            audio_content,
        })
    }

    /// Extract text from a document image and explain it in `target`
    pub async fn document_flow(
        &self,
        image: &[u8],
        source: Language,
        target: Language,
    ) -> Result<DocumentResult, DocumentFlowError> {
        let start = Instant::now();
        let caps = &self.capabilities;

        let extracted_text = match caps.extractor.extract_text(image, source).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(extractor = caps.extractor.name(), error = %e, "Text extraction failed");
                record_flow("document", "extraction_failed", start);
                return Err(DocumentFlowError::ExtractionFailed(e));
            }
        };

        let translated_text = caps.translator.translate(&extracted_text, source, target).await;
        let analysis = caps
            .translator
            .translate(
                analyze_document(&extracted_text),
                self.working_language,
                target,
            )
            .await;

        record_flow("document", "success", start);
        Ok(DocumentResult {
            extracted_text,
            translated_text,
            analysis,
        })
    }

    /// Weather advisory message for `location`; always returns text
    pub async fn weather_advisory(&self, location: &str) -> String {
        let start = Instant::now();
        let caps = &self.capabilities;

        let report = match caps.weather.current(location).await {
            Ok(report) => report,
            Err(e) if e.is_timeout() => {
                record_flow("weather", "timeout", start);
                return WEATHER_SERVICE_DOWN.to_string();
            }
            Err(CapabilityError::MalformedResponse(detail)) => {
                record_flow("weather", "invalid_data", start);
                return invalid_weather_data(&detail);
            }
            Err(_) => {
                record_flow("weather", "unavailable", start);
                return WEATHER_UNAVAILABLE_FOR_LOCATION.to_string();
            }
        };

        let advisory = match caps.responder.complete(&advisory_prompt(&report)).await {
            Some(text) => text,
            None => {
                tracing::info!(location = %report.location, "Using rule-based weather advisory");
                basic_advisory(&report)
            }
        };

        record_flow("weather", "success", start);
        format_weather_message(&report, &advisory)
    }
}

fn record_flow(flow: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("agrisaarthi_flows_total", "flow" => flow, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("agrisaarthi_flow_duration_seconds", "flow" => flow)
        .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrisaarthi_core::{AudioFormat, WeatherReport};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct ScriptedRecognizer {
        result: Result<Utterance, CapabilityError>,
    }

    #[async_trait]
    impl SpeechRecognizer for ScriptedRecognizer {
        async fn recognize(
            &self,
            _audio: &AudioInput,
            _language: Language,
        ) -> Result<Utterance, CapabilityError> {
            self.result.clone()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct TaggingTranslator {
        calls: Mutex<Vec<(Language, Language)>>,
    }

    #[async_trait]
    impl Translator for TaggingTranslator {
        async fn try_translate(
            &self,
            text: &str,
            source: Language,
            target: Language,
        ) -> Result<String, CapabilityError> {
            self.calls.lock().push((source, target));
            Ok(format!("[{}] {}", target, text))
        }

        fn name(&self) -> &str {
            "tagging"
        }
    }

    struct ScriptedSynthesizer {
        fail: bool,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl SpeechSynthesizer for ScriptedSynthesizer {
        async fn synthesize(
            &self,
            _text: &str,
            _language: Language,
            gender: VoiceGender,
        ) -> Result<String, CapabilityError> {
            *self.calls.lock() += 1;
            if self.fail {
                Err(CapabilityError::Timeout("tts".into()))
            } else {
                Ok(format!("audio-{}", gender.as_str()))
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct ScriptedExtractor {
        result: Result<String, CapabilityError>,
    }

    #[async_trait]
    impl TextExtractor for ScriptedExtractor {
        async fn extract_text(
            &self,
            _image: &[u8],
            _language: Language,
        ) -> Result<String, CapabilityError> {
            self.result.clone()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct ScriptedWeather {
        result: Result<WeatherReport, CapabilityError>,
    }

    #[async_trait]
    impl WeatherProvider for ScriptedWeather {
        async fn current(&self, _location: &str) -> Result<WeatherReport, CapabilityError> {
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct EchoResponder {
        questions: Mutex<Vec<String>>,
        completion: Option<String>,
    }

    #[async_trait]
    impl Responder for EchoResponder {
        async fn answer(&self, question: &str) -> Answer {
            self.questions.lock().push(question.to_string());
            Answer {
                text: format!("answer to {}", question),
                source: AnswerSource::Backend("echo".into()),
                attempts: vec![],
            }
        }

        async fn complete(&self, _prompt: &str) -> Option<String> {
            self.completion.clone()
        }
    }

    struct Harness {
        translator: Arc<TaggingTranslator>,
        synthesizer: Arc<ScriptedSynthesizer>,
        responder: Arc<EchoResponder>,
        orchestrator: Orchestrator,
    }

    fn report() -> WeatherReport {
        WeatherReport {
            location: "Pune".into(),
            temp_c: 25.0,
            condition: "Sunny".into(),
            wind_kph: 8.0,
            humidity: 55.0,
        }
    }

    fn harness(
        recognized: Result<Utterance, CapabilityError>,
        synthesis_fails: bool,
        weather: Result<WeatherReport, CapabilityError>,
        completion: Option<String>,
    ) -> Harness {
        let translator = Arc::new(TaggingTranslator::default());
        let synthesizer = Arc::new(ScriptedSynthesizer {
            fail: synthesis_fails,
            calls: Mutex::new(0),
        });
        let responder = Arc::new(EchoResponder {
            questions: Mutex::new(Vec::new()),
            completion,
        });
        let capabilities = Capabilities {
            recognizer: Arc::new(ScriptedRecognizer { result: recognized }),
            translator: translator.clone(),
            synthesizer: synthesizer.clone(),
            extractor: Arc::new(ScriptedExtractor {
                result: Ok("PM-KISAN beneficiary status".into()),
            }),
            weather: Arc::new(ScriptedWeather { result: weather }),
            responder: responder.clone(),
        };
        Harness {
            translator,
            synthesizer,
            responder,
            orchestrator: Orchestrator::new(capabilities, Language::English, VoiceGender::Female),
        }
    }

    fn voice_request(source: Language, target: Language) -> VoiceRequest {
        VoiceRequest {
            audio: AudioInput::new(vec![1, 2, 3], AudioFormat::Webm),
            source,
            target,
            gender: None,
        }
    }

    #[tokio::test]
    async fn test_voice_flow_translates_both_ways() {
        let h = harness(
            Ok(Utterance::new("धान कैसे उगाएं", Language::Hindi)),
            false,
            Ok(report()),
            None,
        );

        let result = h
            .orchestrator
            .voice_flow(voice_request(Language::Hindi, Language::Hindi))
            .await
            .unwrap();

        assert_eq!(result.recognized_text, "धान कैसे उगाएं");
        assert_eq!(result.recognized_language, Language::Hindi);
        assert_eq!(result.question_in_working, "[en] धान कैसे उगाएं");
        assert_eq!(result.answer_in_working, "answer to [en] धान कैसे उगाएं");
        assert_eq!(result.answer_translated, "[hi] answer to [en] धान कैसे उगाएं");
        assert_eq!(result.answer_language, Language::Hindi);
        assert_eq!(result.audio_content.as_deref(), Some("audio-female"));
        assert_eq!(
            *h.translator.calls.lock(),
            vec![
                (Language::Hindi, Language::English),
                (Language::English, Language::Hindi)
            ]
        );
    }

    #[tokio::test]
    async fn test_voice_flow_recognition_failure_stops_pipeline() {
        let h = harness(
            Err(CapabilityError::EmptyResult("asr")),
            false,
            Ok(report()),
            None,
        );

        let err = h
            .orchestrator
            .voice_flow(voice_request(Language::Hindi, Language::Hindi))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Speech recognition failed");
        assert!(h.translator.calls.lock().is_empty());
        assert!(h.responder.questions.lock().is_empty());
        assert_eq!(*h.synthesizer.calls.lock(), 0);
    }

    #[tokio::test]
    async fn test_voice_flow_blank_recognition_is_failure() {
        let h = harness(Ok(Utterance::new("  ", Language::Hindi)), false, Ok(report()), None);

        let result = h
            .orchestrator
            .voice_flow(voice_request(Language::Hindi, Language::Hindi))
            .await;

        assert!(matches!(
            result,
            Err(VoiceFlowError::RecognitionFailed(CapabilityError::EmptyResult("asr")))
        ));
        assert!(h.responder.questions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_voice_flow_english_skips_translation() {
        let h = harness(
            Ok(Utterance::new("How do I grow rice?", Language::English)),
            false,
            Ok(report()),
            None,
        );

        let result = h
            .orchestrator
            .voice_flow(voice_request(Language::English, Language::English))
            .await
            .unwrap();

        assert!(h.translator.calls.lock().is_empty());
        assert_eq!(result.question_in_working, "How do I grow rice?");
        assert_eq!(result.answer_translated, result.answer_in_working);
        assert!(result.audio_content.is_some());
    }

    #[tokio::test]
    async fn test_voice_flow_synthesis_failure_keeps_text() {
        let h = harness(
            Ok(Utterance::new("How do I grow rice?", Language::English)),
            true,
            Ok(report()),
            None,
        );

        let mut request = voice_request(Language::English, Language::Tamil);
        request.gender = Some(VoiceGender::Male);
        let result = h.orchestrator.voice_flow(request).await.unwrap();

        assert!(result.audio_content.is_none());
        assert_eq!(result.answer_translated, "[ta] answer to How do I grow rice?");
        assert_eq!(*h.synthesizer.calls.lock(), 1);
    }

    #[tokio::test]
    async fn test_text_flow_round_trip() {
        let h = harness(Err(CapabilityError::EmptyResult("asr")), false, Ok(report()), None);

        let result = h.orchestrator.text_flow("गेहूं", Language::Hindi).await;

        assert_eq!(result.reply, "[hi] answer to [en] गेहूं");
        assert_eq!(h.responder.questions.lock().as_slice(), ["[en] गेहूं"]);
    }

    #[tokio::test]
    async fn test_document_flow_analysis_in_target_language() {
        let h = harness(Err(CapabilityError::EmptyResult("asr")), false, Ok(report()), None);

        let result = h
            .orchestrator
            .document_flow(b"png", Language::English, Language::Marathi)
            .await
            .unwrap();

        assert_eq!(result.extracted_text, "PM-KISAN beneficiary status");
        assert_eq!(result.translated_text, "[mr] PM-KISAN beneficiary status");
        assert!(result.analysis.starts_with("[mr] "));
        assert!(result.analysis.contains("PM-KISAN"));
    }

    #[tokio::test]
    async fn test_weather_advisory_prefers_generated_text() {
        let h = harness(
            Err(CapabilityError::EmptyResult("asr")),
            false,
            Ok(report()),
            Some("Irrigate in the evening.".into()),
        );

        let message = h.orchestrator.weather_advisory("Pune").await;
        assert_eq!(
            message,
            "Current temperature in Pune is 25.0°C with Sunny. \
             Wind speed is 8.0 km/h and humidity is 55%. Irrigate in the evening."
        );
    }

    #[tokio::test]
    async fn test_weather_advisory_rule_based_without_backend() {
        let h = harness(Err(CapabilityError::EmptyResult("asr")), false, Ok(report()), None);

        let message = h.orchestrator.weather_advisory("Pune").await;
        assert!(message.ends_with("Excellent weather conditions for all agricultural activities."));
    }

    #[tokio::test]
    async fn test_weather_advisory_provider_errors() {
        let timeout = harness(
            Err(CapabilityError::EmptyResult("asr")),
            false,
            Err(CapabilityError::Timeout("weather".into())),
            None,
        );
        assert_eq!(
            timeout.orchestrator.weather_advisory("Pune").await,
            WEATHER_SERVICE_DOWN
        );

        let bad_status = harness(
            Err(CapabilityError::EmptyResult("asr")),
            false,
            Err(CapabilityError::Status {
                status: 400,
                body: "No matching location".into(),
            }),
            None,
        );
        assert_eq!(
            bad_status.orchestrator.weather_advisory("Atlantis").await,
            WEATHER_UNAVAILABLE_FOR_LOCATION
        );

        let malformed = harness(
            Err(CapabilityError::EmptyResult("asr")),
            false,
            Err(CapabilityError::MalformedResponse("missing field `current`".into())),
            None,
        );
        assert_eq!(
            malformed.orchestrator.weather_advisory("Pune").await,
            "Invalid weather data received: missing field `current`"
        );
    }
}
