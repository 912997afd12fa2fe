//! Weather advisory text: threshold rules, generative prompt and reply template

use agrisaarthi_core::WeatherReport;

use crate::keywords::matches_any;

/// Reply when the provider answered with an error or unusable data
pub const WEATHER_UNAVAILABLE_FOR_LOCATION: &str =
    "Unable to fetch weather data for this location at the moment.";

/// Reply when the provider timed out
pub const WEATHER_SERVICE_DOWN: &str =
    "Weather service is currently unavailable. Please try again later.";

/// Reply when the provider answered but the payload lacked expected fields
pub fn invalid_weather_data(detail: &str) -> String {
    format!("Invalid weather data received: {}", detail)
}

/// Decimal reading with at least one fractional digit (`25.0`, `11.25`)
fn decimal(value: f64) -> String {
    format!("{:?}", value)
}

const RAIN_WORDS: &[&str] = &["rain", "shower", "drizzle", "storm", "thunderstorm"];
const CLOUD_WORDS: &[&str] = &["cloudy", "overcast"];

/// Farming advice derived from temperature, condition, wind and humidity
pub fn basic_advisory(report: &WeatherReport) -> String {
    let temp = report.temp_c;
    let wind = report.wind_kph;
    let humidity = report.humidity;
    let condition = report.condition.to_lowercase();

    let mut advisories: Vec<&str> = Vec::new();

    if temp > 40.0 {
        advisories.push("Extreme heat warning! Avoid field work during peak hours (11 AM - 3 PM).");
    } else if temp > 35.0 {
        advisories.push(
            "High temperature - consider evening irrigation and provide shade for sensitive crops.",
        );
    } else if temp < 5.0 {
        advisories
            .push("Frost risk! Protect sensitive crops with covers or move potted plants indoors.");
    } else if temp < 15.0 {
        advisories.push("Cool weather - good for root development and transplanting.");
    }

    if matches_any(&condition, RAIN_WORDS) {
        advisories.push("Avoid pesticide spraying due to rainfall. Postpone fertilizer application.");
    } else if matches_any(&condition, CLOUD_WORDS) {
        advisories.push("Cloudy conditions are good for transplanting and root development.");
    }

    if wind > 20.0 {
        advisories.push("High wind speed - avoid spraying pesticides and protect young plants.");
    } else if wind > 10.0 {
        advisories.push("Moderate wind - avoid aerial spraying but ground application is safe.");
    }

    if humidity > 80.0 {
        advisories.push("High humidity - watch for fungal diseases. Ensure good air circulation.");
    } else if humidity < 30.0 {
        advisories.push("Low humidity - increase irrigation frequency and consider mulching.");
    }

    if advisories.is_empty() {
        let ideal = (20.0..=30.0).contains(&temp)
            && (5.0..=15.0).contains(&wind)
            && (40.0..=70.0).contains(&humidity);
        if ideal {
            advisories.push("Excellent weather conditions for all agricultural activities.");
        } else {
            advisories.push("Weather is generally suitable for field work today.");
        }
    }

    advisories.join(" ")
}

/// Prompt asking a generative backend for a weather-based advisory
pub fn advisory_prompt(report: &WeatherReport) -> String {
    format!(
        "You are AgriSaarthi, an expert agricultural advisor for Indian farmers.

Current weather conditions in {location}:
- Temperature: {temp}°C
- Weather: {condition}
- Wind Speed: {wind} km/h
- Humidity: {humidity}%

Provide a comprehensive agricultural advisory that includes:
1. Specific farming activities suitable for today's weather
2. Precautions to take based on current conditions
3. Irrigation recommendations
4. Pest and disease management advice
5. Crop-specific recommendations for common Indian crops (rice, wheat, cotton, sugarcane, vegetables)

Keep the advice practical, actionable, and specific to Indian farming conditions.
Use simple language that farmers can easily understand.
Focus on immediate actions they can take today.

Format: Provide 3-4 specific, actionable recommendations in 2-3 sentences each.",
        location = report.location,
        temp = decimal(report.temp_c),
        condition = report.condition.to_lowercase(),
        wind = decimal(report.wind_kph),
        humidity = report.humidity,
    )
}

/// Full reply for the weather advisory endpoint
pub fn format_weather_message(report: &WeatherReport, advisory: &str) -> String {
    format!(
        "Current temperature in {} is {}°C with {}. Wind speed is {} km/h and humidity is {}%. {}",
        report.location,
        decimal(report.temp_c),
        report.condition,
        decimal(report.wind_kph),
        report.humidity,
        advisory.trim()
    )
}
