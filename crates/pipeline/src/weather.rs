//! WeatherAPI.com `current.json` client

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use agrisaarthi_config::WeatherConfig;
use agrisaarthi_core::{CapabilityError, WeatherProvider, WeatherReport};

use crate::http::{build_client, ensure_success, record_latency};

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: LocationData,
    current: CurrentData,
}

#[derive(Debug, Deserialize)]
struct LocationData {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    temp_c: f64,
    condition: ConditionData,
    wind_kph: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionData {
    text: String,
}

pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn fetch(&self, location: &str) -> Result<WeatherReport, CapabilityError> {
        let response = self
            .client
            .get(format!("{}/current.json", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("q", location)])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let data: CurrentResponse = serde_json::from_str(&response.text().await?)?;

        Ok(WeatherReport {
            location: data.location.name,
            temp_c: data.current.temp_c,
            condition: data.current.condition.text,
            wind_kph: data.current.wind_kph,
            humidity: data.current.humidity,
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn current(&self, location: &str) -> Result<WeatherReport, CapabilityError> {
        if location.trim().is_empty() {
            return Err(CapabilityError::InvalidInput("location is required".to_string()));
        }

        let start = Instant::now();
        let result = self.fetch(location.trim()).await;
        record_latency("weather", start.elapsed(), result.is_ok());

        if let Err(e) = &result {
            tracing::warn!(location, error = %e, "Weather lookup failed");
        }
        result
    }
}
