//! AI provider integration

mod groq;

use thiserror::Error;

pub use groq::{GroqProvider, GROQ_BASE_URL};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
