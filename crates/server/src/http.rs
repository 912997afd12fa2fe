//! HTTP Endpoints
//!
//! Router, middleware and the chat, weather and service info handlers.

use std::time::Duration;

use axum::{
    extract::{Json, Query, State},
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::metrics::{metrics_handler, record_request};
use crate::state::AppState;
use crate::{bhashini, bot, parse_language, ServerError};

const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /metrics",
    "POST /api/chat",
    "POST /api/tts",
    "POST /api/bhashini/asr",
    "POST /api/bhashini/translate",
    "POST /api/bhashini/tts",
    "POST /api/bhashini/complete-flow",
    "POST /api/bhashini/ocr",
    "POST /bot/process-message",
    "POST /bot/process-audio",
    "GET /data/weather_advisory?location=",
];

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );
    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/chat", post(chat))
        .route("/api/tts", post(bhashini::legacy_tts))
        .route("/api/bhashini/asr", post(bhashini::asr))
        .route("/api/bhashini/translate", post(bhashini::translate))
        .route("/api/bhashini/tts", post(bhashini::tts))
        .route("/api/bhashini/complete-flow", post(bhashini::complete_flow))
        .route("/api/bhashini/ocr", post(bhashini::ocr))
        .route("/bot/process-message", post(bot::process_message))
        .route("/bot/process-audio", post(bot::process_audio))
        .route("/data/weather_advisory", get(weather_advisory))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Configured origins when enabled; permissive otherwise
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": state.config.server.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "working_language": state.orchestrator.working_language(),
        "endpoints": ENDPOINTS,
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.server.service_name,
    }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    timestamp: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    record_request("chat");

    // A blank message still gets the generic advisory
    let language = parse_language(request.language.as_deref(), state.config.pipeline.source())?;

    tracing::info!(language = %language, chars = request.message.chars().count(), "Chat request");
    let result = state.orchestrator.text_flow(&request.message, language).await;

    Ok(Json(ChatResponse {
        response: result.reply,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    #[serde(default)]
    location: String,
}

async fn weather_advisory(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Json<serde_json::Value> {
    record_request("weather");
    let message = state.orchestrator.weather_advisory(&query.location).await;
    Json(serde_json::json!({ "message": message }))
}
