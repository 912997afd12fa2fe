//! Gemini wire behavior and model fallthrough against a mock server

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agrisaarthi_config::GeminiConfig;
use agrisaarthi_core::{AnswerSource, Responder};
use agrisaarthi_llm::{create_responder, FailureKind, GeminiBackend, GenerativeBackend};

fn config(server: &MockServer) -> GeminiConfig {
    GeminiConfig {
        api_key: "test-key".to_string(),
        endpoint: server.uri(),
        timeout_secs: 5,
        ..GeminiConfig::default()
    }
}

fn candidate(text: &str) -> serde_json::Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }] })
}

#[tokio::test]
async fn test_generate_sends_generation_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "hello" }] }],
            "generationConfig": { "topK": 40, "maxOutputTokens": 2048 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(" Namaste! ")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(&config(&server), "gemini-1.5-flash").unwrap();
    assert_eq!(backend.generate("hello").await.unwrap(), "Namaste!");
}

#[tokio::test]
async fn test_quota_and_not_found_classification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "models/gemini-pro is not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let flash = GeminiBackend::new(&config(&server), "gemini-1.5-flash").unwrap();
    let err = flash.generate("hi").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::QuotaExceeded);

    let legacy = GeminiBackend::new(&config(&server), "gemini-pro").unwrap();
    let err = legacy.generate("hi").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::NotFound);
}

#[tokio::test]
async fn test_missing_candidates_is_other() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(&config(&server), "gemini-1.5-flash").unwrap();
    let err = backend.generate("hi").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Other);
}

#[tokio::test]
async fn test_responder_falls_through_to_second_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded", "status": "UNAVAILABLE" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Sow wheat in November.")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let responder = create_responder(&config(&server)).unwrap();
    let answer = responder.answer("When to sow wheat?").await;

    assert_eq!(answer.text, "Sow wheat in November.");
    assert_eq!(answer.source, AnswerSource::Backend("gemini-1.5-pro".into()));
    assert_eq!(answer.attempts[0].outcome.label(), "not_found");
}

#[tokio::test]
async fn test_all_models_unavailable_gives_rule_based_rice_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .expect(3)
        .mount(&server)
        .await;

    let responder = create_responder(&config(&server)).unwrap();
    let answer = responder.answer("How to grow rice?").await;

    assert_eq!(answer.source, AnswerSource::RuleBased);
    assert!(answer.text.starts_with("To grow rice successfully:"));
    assert_eq!(answer.attempts.len(), 3);
}
