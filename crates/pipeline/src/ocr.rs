//! Document OCR through the legacy sandbox API

use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use agrisaarthi_config::BhashiniConfig;
use agrisaarthi_core::{CapabilityError, Language, TextExtractor};

use crate::http::{build_client, ensure_success, record_latency};

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    data: Option<OcrData>,
}

#[derive(Debug, Deserialize)]
struct OcrData {
    #[serde(default)]
    decoded_text: Option<String>,
}

/// Multipart upload to `{base}/sandboxbeprod/ocr`
pub struct CanvasOcr {
    client: Client,
    base_url: String,
    access_token: String,
    max_bytes: usize,
}

impl CanvasOcr {
    pub fn new(config: &BhashiniConfig) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.canvas_base_url.trim_end_matches('/').to_string(),
            access_token: config.canvas_access_token.clone(),
            max_bytes: config.max_audio_bytes,
        })
    }

    async fn upload(&self, image: &[u8]) -> Result<String, CapabilityError> {
        let part = Part::bytes(image.to_vec())
            .file_name("document.png")
            .mime_str("image/png")
            .map_err(|e| CapabilityError::InvalidInput(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/sandboxbeprod/ocr", self.base_url))
            .header("access-token", &self.access_token)
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body: OcrResponse = serde_json::from_str(&response.text().await?)?;

        body.data
            .and_then(|d| d.decoded_text)
            .ok_or_else(|| CapabilityError::MalformedResponse("missing data.decoded_text".to_string()))
    }
}

#[async_trait]
impl TextExtractor for CanvasOcr {
    async fn extract_text(
        &self,
        image: &[u8],
        language: Language,
    ) -> Result<String, CapabilityError> {
        if image.is_empty() {
            return Err(CapabilityError::InvalidInput("empty image".to_string()));
        }
        if image.len() > self.max_bytes {
            return Err(CapabilityError::PayloadTooLarge {
                size: image.len(),
                max: self.max_bytes,
            });
        }

        let start = Instant::now();
        let result = self.upload(image).await;
        record_latency("ocr", start.elapsed(), result.is_ok());

        let text = result?;
        if text.trim().is_empty() {
            return Err(CapabilityError::EmptyResult("ocr"));
        }

        tracing::info!(language = %language, chars = text.chars().count(), "Document text extracted");
        Ok(text)
    }

    fn name(&self) -> &str {
        "canvas"
    }
}
