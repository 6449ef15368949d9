//! Boundary to the external generative-text provider.

pub mod gemini;
pub mod normalize;
pub mod types;

pub use gemini::{GeminiClient, GeminiConfig};
pub use normalize::{GENERATION_FAILED_REPLY, NO_RESPONSE_REPLY, normalize_reply};
pub use types::{
    Candidate, CandidateContent, Content, GenerateRequest, GenerateResult, GenerationConfig, Part,
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a provider call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure (DNS, connect, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// Provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body.
        message: String,
    },
    /// Response body was not the expected JSON.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl GatewayError {
    /// Whether the provider rejected the credential.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    /// Whether the provider refused for quota or rate reasons.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }
}

/// Convenience result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// A fallible text-in, text-out generative call.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one generation.
    ///
    /// # Errors
    /// Returns a [`GatewayError`] on transport, status or decoding failure.
    async fn generate(&self, request: &GenerateRequest) -> GatewayResult<GenerateResult>;
}
