//! Weather-constrained chat gateway
//!
//! Every failure mode degrades to a human-readable reply string; the chat
//! endpoint never surfaces an error status. Two gates run before any
//! upstream call: the session must hold a last-searched city, and the
//! message must mention a weather-related keyword.

use std::sync::Arc;

use crate::providers::GroqProvider;
use crate::weather::{Location, WeatherClient};

pub const NO_CITY_REPLY: &str = "Please search for a city first.";
pub const OFF_TOPIC_REPLY: &str = "I can only help with weather-related questions.";
pub const CITY_LOOKUP_FAILED_REPLY: &str = "City not found.";
pub const UPSTREAM_FAILURE_REPLY: &str = "AI service temporarily unavailable.";

/// A message must contain at least one of these (case-insensitive substring
/// test) to reach the model.
const ALLOWED_KEYWORDS: [&str; 20] = [
    "weather",
    "temperature",
    "rain",
    "humidity",
    "wind",
    "forecast",
    "climate",
    "hot",
    "cold",
    "storm",
    "snow",
    "heat",
    "umbrella",
    "jacket",
    "travel",
    "today",
    "tomorrow",
    "week",
    "sunny",
    "cloudy",
];

/// System instruction sent with every completion. The keyword gate is a
/// pre-filter; this is the second layer constraining the model itself.
const SYSTEM_PROMPT: &str = "\
You are a strict weather assistant.
You ONLY answer questions related to weather, temperature, rain, humidity, \
wind, forecasts, clothing suggestions based on weather, and travel advice \
based on weather.

If the question is not related to weather, respond with:
\"I can only help with weather-related questions.\"";

pub struct ChatGateway {
    weather: Arc<WeatherClient>,
    provider: Arc<GroqProvider>,
}

impl ChatGateway {
    pub fn new(weather: Arc<WeatherClient>, provider: Arc<GroqProvider>) -> Self {
        Self { weather, provider }
    }

    /// Answer a chat message in the context of the session's last city.
    pub async fn respond(&self, message: &str, last_city: Option<&str>) -> String {
        let Some(city) = last_city else {
            return NO_CITY_REPLY.to_string();
        };

        let message = message.trim().to_lowercase();
        if !is_weather_related(&message) {
            return OFF_TOPIC_REPLY.to_string();
        }

        // Fresh conditions on every exchange; the cause of a failed lookup
        // is deliberately not distinguished in the reply.
        let current = match self.weather.current(&Location::City(city.to_string())).await {
            Ok(current) => current,
            Err(_) => return CITY_LOOKUP_FAILED_REPLY.to_string(),
        };

        let context = format!(
            "City: {}\nTemperature: {}°C\nHumidity: {}%\nWind Speed: {} m/s\nCondition: {}",
            current.city, current.temp, current.humidity, current.wind, current.description
        );
        let user = format!("{context}\n\nUser question: {message}");

        match self.provider.complete(SYSTEM_PROMPT, &user).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(error = %err, "chat completion failed");
                UPSTREAM_FAILURE_REPLY.to_string()
            }
        }
    }
}

/// Keyword pre-filter. Expects an already trimmed, lowercased message.
fn is_weather_related(message: &str) -> bool {
    ALLOWED_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}
