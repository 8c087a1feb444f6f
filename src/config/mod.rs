//! Application configuration

use std::env;

use anyhow::Context;

/// Default Groq model used for chat completions.
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// OpenWeatherMap API key. Required.
    pub openweather_api_key: String,
    /// Groq API key. Required.
    pub groq_api_key: String,
    /// Model identifier sent with every completion request.
    pub chat_model: String,
    /// Timeout applied to every upstream HTTP call, in seconds.
    pub upstream_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Fails fast if either upstream API key is missing so the process
    /// never starts half-configured.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .context("OPENWEATHER_API_KEY is not set")?,
            groq_api_key: env::var("GROQ_API_KEY").context("GROQ_API_KEY is not set")?,
            chat_model: env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.into()),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(10),
        })
    }
}
