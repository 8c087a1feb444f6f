//! Skycast - weather dashboard backend with a weather-constrained chat assistant
//!
//! Proxies OpenWeatherMap (current conditions + 5-day forecast) and a
//! Groq-hosted chat completion API behind a same-origin web app. The chat
//! endpoint only answers weather questions, using the session's last
//! searched city as context.

use std::sync::Arc;

pub mod chat;
pub mod config;
pub mod providers;
pub mod routes;
pub mod session;
pub mod weather;

use chat::ChatGateway;
use session::SessionStore;
use weather::WeatherClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherClient>,
    pub gateway: Arc<ChatGateway>,
    pub sessions: Arc<dyn SessionStore>,
}
