//! Shared HTTP plumbing for the capability clients

use std::time::Duration;

use agrisaarthi_core::CapabilityError;
use reqwest::{Client, Response};

/// Build a client with a bounded per-request timeout
pub fn build_client(timeout_secs: u64) -> Result<Client, CapabilityError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| CapabilityError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-2xx response into `CapabilityError::Status`, keeping the body
pub async fn ensure_success(response: Response) -> Result<Response, CapabilityError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CapabilityError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Record the latency of one capability call
pub fn record_latency(capability: &'static str, elapsed: Duration, ok: bool) {
    metrics::histogram!(
        "agrisaarthi_capability_latency_seconds",
        "capability" => capability
    )
    .record(elapsed.as_secs_f64());

    if !ok {
        metrics::counter!("agrisaarthi_capability_errors_total", "capability" => capability)
            .increment(1);
    }
}
