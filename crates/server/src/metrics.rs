//! Prometheus metrics endpoint and request counters

use std::sync::OnceLock;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder; later calls return the first handle
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Some(handle);
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            register_default_metrics();
            Some(METRICS_HANDLE.get_or_init(|| handle))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

fn register_default_metrics() {
    const ENDPOINTS: &[&str] = &[
        "chat",
        "bot_message",
        "bot_audio",
        "asr",
        "translate",
        "tts",
        "complete_flow",
        "ocr",
        "weather",
    ];
    for &endpoint in ENDPOINTS {
        counter!("agrisaarthi_requests_total", "endpoint" => endpoint).absolute(0);
    }
}

pub fn record_request(endpoint: &'static str) {
    counter!("agrisaarthi_requests_total", "endpoint" => endpoint).increment(1);
}

pub fn record_error(kind: &'static str) {
    counter!("agrisaarthi_errors_total", "kind" => kind).increment(1);
}

pub async fn metrics_handler() -> impl IntoResponse {
    match METRICS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}
