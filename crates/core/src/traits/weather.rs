use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub temp_c: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub humidity: f64,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + 'static {
    async fn current(&self, location: &str) -> Result<WeatherReport, CapabilityError>;
}
