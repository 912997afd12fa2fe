//! Router tests over scripted capabilities and the in-memory store

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use tower::ServiceExt;

use agrisaarthi_advisory::weather::WEATHER_SERVICE_DOWN;
use agrisaarthi_advisory::RuleBasedResponder;
use agrisaarthi_config::Settings;
use agrisaarthi_core::{
    Answer, AnswerSource, AudioInput, CapabilityError, Language, Responder, SpeechRecognizer,
    SpeechSynthesizer, TextExtractor, Translator, Utterance, VoiceGender, WeatherProvider,
    WeatherReport,
};
use agrisaarthi_llm::{GenerationError, GenerativeBackend, GenerativeResponder};
use agrisaarthi_persistence::{
    InMemoryStore, MessageStore, NewMessage, PersistenceError, PersistenceLayer,
};
use agrisaarthi_pipeline::{AudioFetcher, Capabilities, Orchestrator};
use agrisaarthi_server::{create_router, AppState};

struct ScriptedRecognizer(Result<String, CapabilityError>);

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn recognize(
        &self,
        _audio: &AudioInput,
        language: Language,
    ) -> Result<Utterance, CapabilityError> {
        self.0.clone().map(|text| Utterance::new(text, language))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Prefixes the target code so each hop is visible in the output
struct TaggingTranslator;

#[async_trait]
impl Translator for TaggingTranslator {
    async fn try_translate(
        &self,
        text: &str,
        _source: Language,
        target: Language,
    ) -> Result<String, CapabilityError> {
        Ok(format!("[{}] {}", target, text))
    }

    fn name(&self) -> &str {
        "tagging"
    }
}

struct ScriptedSynthesizer {
    fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSynthesizer {
    async fn synthesize(
        &self,
        _text: &str,
        _language: Language,
        gender: VoiceGender,
    ) -> Result<String, CapabilityError> {
        if self.fail {
            return Err(CapabilityError::Status {
                status: 500,
                body: "inference failed".into(),
            });
        }
        Ok(format!("audio-{}", gender))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedExtractor;

#[async_trait]
impl TextExtractor for ScriptedExtractor {
    async fn extract_text(
        &self,
        _image: &[u8],
        _language: Language,
    ) -> Result<String, CapabilityError> {
        Ok("PM-KISAN beneficiary status".into())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct DownWeather;

#[async_trait]
impl WeatherProvider for DownWeather {
    async fn current(&self, _location: &str) -> Result<WeatherReport, CapabilityError> {
        Err(CapabilityError::Timeout("weather".into()))
    }
}

struct EchoResponder;

#[async_trait]
impl Responder for EchoResponder {
    async fn answer(&self, question: &str) -> Answer {
        Answer {
            text: format!("answer to {}", question),
            source: AnswerSource::Backend("echo".into()),
            attempts: vec![],
        }
    }

    async fn complete(&self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Backend that answers late with an error
struct StallingBackend {
    id: String,
    delay: Duration,
}

#[async_trait]
impl GenerativeBackend for StallingBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        tokio::time::sleep(self.delay).await;
        Err(GenerationError::other("503 Service Unavailable"))
    }
}

#[derive(Default)]
struct FailingStore {
    attempts: Mutex<usize>,
}

#[async_trait]
impl MessageStore for FailingStore {
    async fn insert_message(&self, _message: NewMessage) -> Result<(), PersistenceError> {
        *self.attempts.lock() += 1;
        Err(PersistenceError::Connection("connection refused".into()))
    }
}

struct Harness {
    router: Router,
    store: Arc<InMemoryStore>,
}

struct HarnessBuilder {
    recognition: Result<String, CapabilityError>,
    synthesis_fails: bool,
    messages: Option<Arc<dyn MessageStore>>,
    responder: Arc<dyn Responder>,
    settings: Settings,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            recognition: Ok("धान कैसे उगाएं".into()),
            synthesis_fails: false,
            messages: None,
            responder: Arc::new(EchoResponder),
            settings: Settings::default(),
        }
    }
}

fn harness_with(
    recognition: Result<String, CapabilityError>,
    synthesis_fails: bool,
    messages: Option<Arc<dyn MessageStore>>,
) -> Harness {
    build(HarnessBuilder {
        recognition,
        synthesis_fails,
        messages,
        ..Default::default()
    })
}

fn build(builder: HarnessBuilder) -> Harness {
    let HarnessBuilder {
        recognition,
        synthesis_fails,
        messages,
        responder,
        settings,
    } = builder;
    let capabilities = Capabilities {
        recognizer: Arc::new(ScriptedRecognizer(recognition)),
        translator: Arc::new(TaggingTranslator),
        synthesizer: Arc::new(ScriptedSynthesizer {
            fail: synthesis_fails,
        }),
        extractor: Arc::new(ScriptedExtractor),
        weather: Arc::new(DownWeather),
        responder,
    };
    let orchestrator = Orchestrator::new(capabilities, Language::English, VoiceGender::Female);

    let store = Arc::new(InMemoryStore::new());
    let persistence = PersistenceLayer {
        messages: messages.unwrap_or_else(|| store.clone() as Arc<dyn MessageStore>),
        profiles: store.clone(),
    };
    let fetcher = AudioFetcher::new(5, 1024).unwrap();

    let state = AppState::new(settings, orchestrator, persistence, fetcher);
    Harness {
        router: create_router(state),
        store,
    }
}

fn harness() -> Harness {
    build(HarnessBuilder::default())
}

async fn post(router: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

// "audio" in base64
const AUDIO: &str = "YXVkaW8=";

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, body) = get(&h.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let h = harness();
    let (status, body) = get(&h.router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["working_language"], "en");
    assert!(body["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "POST /api/bhashini/complete-flow"));
}

#[tokio::test]
async fn test_chat_translates_both_ways() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/api/chat",
        serde_json::json!({"message": "How to grow rice?", "language": "hi"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "[hi] answer to [en] How to grow rice?");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_chat_defaults_to_english() {
    let h = harness();
    let (_, body) = post(&h.router, "/api/chat", serde_json::json!({"message": "msp for wheat"})).await;
    assert_eq!(body["response"], "answer to msp for wheat");
}

#[tokio::test]
async fn test_chat_blank_message_gets_generic_answer() {
    let h = harness();
    let (status, body) = post(&h.router, "/api/chat", serde_json::json!({"message": "  "})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "answer to   ");

    let (status, body) = post(&h.router, "/api/chat", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "answer to ");
}

#[tokio::test]
async fn test_chat_rejects_unknown_language() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/api/chat",
        serde_json::json!({"message": "hello", "language": "xx"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("xx"));
}

#[tokio::test]
async fn test_complete_flow() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/api/bhashini/complete-flow",
        serde_json::json!({
            "audioContent": AUDIO,
            "sourceLanguage": "hi",
            "targetLanguage": "hi"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["recognizedText"], "धान कैसे उगाएं");
    assert_eq!(body["recognizedLanguage"], "hi");
    assert_eq!(body["questionInEnglish"], "[en] धान कैसे उगाएं");
    assert_eq!(body["answerInEnglish"], "answer to [en] धान कैसे उगाएं");
    assert_eq!(body["answerTranslated"], "[hi] answer to [en] धान कैसे उगाएं");
    assert_eq!(body["answerLanguage"], "hi");
    assert_eq!(body["answerAudioContent"], "audio-female");
}

#[tokio::test]
async fn test_complete_flow_without_audio_is_rejected() {
    let h = harness();
    let (status, body) = post(&h.router, "/api/bhashini/complete-flow", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No audio content provided");
}

#[tokio::test]
async fn test_complete_flow_recognition_failure() {
    let h = harness_with(Err(CapabilityError::Timeout("asr".into())), false, None);
    let (status, body) = post(
        &h.router,
        "/api/bhashini/complete-flow",
        serde_json::json!({"audioContent": AUDIO, "sourceLanguage": "hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Speech recognition failed");
}

#[tokio::test]
async fn test_chat_answers_before_request_timeout() {
    let backends: Vec<Arc<dyn GenerativeBackend>> = ["m1", "m2", "m3"]
        .into_iter()
        .map(|id| {
            Arc::new(StallingBackend {
                id: id.into(),
                delay: Duration::from_millis(600),
            }) as Arc<dyn GenerativeBackend>
        })
        .collect();
    let responder = GenerativeResponder::new(backends, RuleBasedResponder::new())
        .with_deadline(Duration::from_secs(1));

    let mut settings = Settings::default();
    settings.server.timeout_seconds = 2;
    let h = build(HarnessBuilder {
        responder: Arc::new(responder),
        settings,
        ..Default::default()
    });

    let (status, body) = post(
        &h.router,
        "/api/chat",
        serde_json::json!({"message": "How to grow rice?"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("To grow rice successfully:"));
}

#[tokio::test]
async fn test_complete_flow_recognition_status_error() {
    let h = harness_with(
        Err(CapabilityError::Status {
            status: 503,
            body: "model overloaded".into(),
        }),
        false,
        None,
    );
    let (status, body) = post(
        &h.router,
        "/api/bhashini/complete-flow",
        serde_json::json!({"audioContent": AUDIO, "sourceLanguage": "hi", "targetLanguage": "hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Speech recognition failed");

    let (status, _) = post(
        &h.router,
        "/bot/process-audio",
        serde_json::json!({"chat_id": "c", "user_id": "u", "audio_content": AUDIO}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.store.messages()[0].content, agrisaarthi_server::bot::NOT_UNDERSTOOD);
}

#[tokio::test]
async fn test_complete_flow_survives_synthesis_failure() {
    let h = harness_with(Ok("paddy".into()), true, None);
    let (status, body) = post(
        &h.router,
        "/api/bhashini/complete-flow",
        serde_json::json!({"audioContent": AUDIO, "sourceLanguage": "en", "targetLanguage": "en"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answerTranslated"], "answer to paddy");
    assert!(body["answerAudioContent"].is_null());
}

#[tokio::test]
async fn test_asr_endpoint() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/api/bhashini/asr",
        serde_json::json!({"audioContent": format!("data:audio/webm;base64,{}", AUDIO), "sourceLanguage": "hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recognizedText"], "धान कैसे उगाएं");
}

#[tokio::test]
async fn test_invalid_base64_is_a_client_error() {
    let h = harness();
    let (status, _) = post(
        &h.router,
        "/api/bhashini/asr",
        serde_json::json!({"audioContent": "not base64 !!"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_translate_endpoint() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/api/bhashini/translate",
        serde_json::json!({"text": "soil health card", "sourceLanguage": "en", "targetLanguage": "mr"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["originalText"], "soil health card");
    assert_eq!(body["translatedText"], "[mr] soil health card");
    assert_eq!(body["targetLanguage"], "mr");

    let (status, body) = post(&h.router, "/api/bhashini/translate", serde_json::json!({"text": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No text provided");
}

#[tokio::test]
async fn test_tts_endpoints() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/api/bhashini/tts",
        serde_json::json!({"text": "नमस्ते", "targetLanguage": "hi", "gender": "male"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["audioContent"], "audio-male");

    let failing = harness_with(Ok("x".into()), true, None);
    let (status, body) = post(&failing.router, "/api/bhashini/tts", serde_json::json!({"text": "नमस्ते"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Text-to-speech failed");

    let (status, body) = post(&failing.router, "/api/tts", serde_json::json!({"text": "नमस्ते", "language": "hi"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "TTS failed");
}

#[tokio::test]
async fn test_ocr_endpoint() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/api/bhashini/ocr",
        serde_json::json!({"image": "aW1hZ2U=", "sourceLanguage": "en", "targetLanguage": "hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extractedText"], "PM-KISAN beneficiary status");
    assert_eq!(body["translatedText"], "[hi] PM-KISAN beneficiary status");
    assert!(body["analysis"].as_str().unwrap().starts_with("[hi] "));
}

#[tokio::test]
async fn test_bot_message_stores_reply_in_profile_language() {
    let h = harness();
    h.store.set_language("user-1", Language::Hindi);

    let (status, body) = post(
        &h.router,
        "/bot/process-message",
        serde_json::json!({"chat_id": "chat-1", "content": "गेहूं का भाव", "user_id": "user-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Bot response sent");

    let stored = h.store.messages();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].chat_id, "chat-1");
    assert_eq!(stored[0].sender_id, "bot-agrisaarthi");
    assert_eq!(stored[0].message_type, "text");
    assert_eq!(stored[0].content, "[hi] answer to [en] गेहूं का भाव");
}

#[tokio::test]
async fn test_bot_message_unknown_profile_uses_english() {
    let h = harness();
    post(
        &h.router,
        "/bot/process-message",
        serde_json::json!({"chat_id": "c", "content": "urea dose", "user_id": "nobody"}),
    )
    .await;
    assert_eq!(h.store.messages()[0].content, "answer to urea dose");
}

#[tokio::test]
async fn test_bot_message_missing_fields() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/bot/process-message",
        serde_json::json!({"chat_id": "chat-1", "content": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert!(h.store.messages().is_empty());
}

#[tokio::test]
async fn test_bot_message_store_failure() {
    let failing = Arc::new(FailingStore::default());
    let h = harness_with(Ok("x".into()), false, Some(failing.clone()));
    let (status, body) = post(
        &h.router,
        "/bot/process-message",
        serde_json::json!({"chat_id": "c", "content": "hello", "user_id": "u"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save bot response");
    assert_eq!(*failing.attempts.lock(), 1);
}

#[tokio::test]
async fn test_bot_audio_answers_transcript() {
    let h = harness_with(Ok("paddy seed rate".into()), false, None);
    let (status, _) = post(
        &h.router,
        "/bot/process-audio",
        serde_json::json!({"chat_id": "c", "user_id": "u", "audio_content": AUDIO}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.store.messages()[0].content, "answer to paddy seed rate");
}

#[tokio::test]
async fn test_bot_audio_not_understood() {
    let h = harness_with(Err(CapabilityError::EmptyResult("asr")), false, None);
    let (status, _) = post(
        &h.router,
        "/bot/process-audio",
        serde_json::json!({"chat_id": "c", "user_id": "u", "audio_content": AUDIO}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        h.store.messages()[0].content,
        "I couldn't understand your audio message. Please try speaking more clearly."
    );
}

#[tokio::test]
async fn test_bot_audio_requires_audio() {
    let h = harness();
    let (status, _) = post(
        &h.router,
        "/bot/process-audio",
        serde_json::json!({"chat_id": "c", "user_id": "u"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weather_advisory_service_down() {
    let h = harness();
    let (status, body) = get(&h.router, "/data/weather_advisory?location=Pune").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], WEATHER_SERVICE_DOWN);
}
