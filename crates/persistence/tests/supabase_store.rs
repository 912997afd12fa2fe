//! Supabase REST wire behavior against a mock server

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agrisaarthi_config::PersistenceConfig;
use agrisaarthi_core::Language;
use agrisaarthi_persistence::{
    MessageStore, NewMessage, PersistenceError, ProfileStore, SupabaseStore,
};

fn store(server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(&PersistenceConfig {
        enabled: true,
        supabase_url: server.uri(),
        supabase_key: "anon-key".to_string(),
        timeout_secs: 5,
        ..PersistenceConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_insert_posts_bot_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/messages"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .and(body_json(json!({
            "chat_id": "chat-42",
            "sender_id": "bot-agrisaarthi",
            "content": "Use drip irrigation.",
            "type": "text"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .insert_message(NewMessage::bot_reply("chat-42", "Use drip irrigation."))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_insert_requires_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = store(&server)
        .insert_message(NewMessage::bot_reply("chat-42", "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersistenceError::Status { status: 200, .. }));
}

#[tokio::test]
async fn test_profile_language_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.user-7"))
        .and(query_param("select", "language"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "language": "te" }])))
        .mount(&server)
        .await;

    let language = store(&server).preferred_language("user-7").await.unwrap();
    assert_eq!(language, Some(Language::Telugu));
}

#[tokio::test]
async fn test_missing_or_unknown_profile_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("id", "eq.nobody"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("id", "eq.klingon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "language": "tlh" }])))
        .mount(&server)
        .await;

    let store = store(&server);
    assert_eq!(store.preferred_language("nobody").await.unwrap(), None);
    assert_eq!(store.preferred_language("klingon").await.unwrap(), None);
}

#[test]
fn test_requires_url() {
    let result = SupabaseStore::new(&PersistenceConfig {
        enabled: true,
        supabase_url: String::new(),
        supabase_key: String::new(),
        timeout_secs: 5,
        ..PersistenceConfig::default()
    });
    assert!(matches!(result, Err(PersistenceError::Configuration(_))));
}
