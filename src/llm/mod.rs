//! Text-completion providers.
//!
//! Generation goes through [`CompletionProvider`] so handlers never talk to a
//! concrete vendor API; [`gemini::GeminiProvider`] is the production backend.

pub mod gemini;

use axum::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider api error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("rate limited")]
    RateLimited,

    #[error("response blocked: {0}")]
    Blocked(String),

    #[error("response contained no text")]
    EmptyResponse,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Single-shot completion of `prompt`. No retries.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
