//! Google Gemini client over the Generative Language REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::gateway::types::{Candidate, Content, GenerateRequest, GenerateResult, GenerationConfig, Part};
use crate::gateway::{GatewayError, GatewayResult, GenerativeModel};

/// Public Generative Language API base.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Gemini client configuration.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// API base URL, without the `/models` suffix.
    pub base_url: String,
    /// Overall request timeout.
    pub request_timeout: Duration,
}

impl GeminiConfig {
    /// Config for the public endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Point the client at another base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the overall request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: &'a [Content],
    generation_config: &'a GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    response: Option<DirectResponse>,
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct DirectResponse {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl From<GenerateContentResponse> for GenerateResult {
    fn from(raw: GenerateContentResponse) -> Self {
        if let Some(parts) = raw.response.and_then(|r| r.parts) {
            return Self::Parts(parts);
        }
        match raw.candidates {
            Some(candidates) if !candidates.is_empty() => Self::Candidates(candidates),
            _ => Self::Empty,
        }
    }
}

/// Async Gemini client.
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> GatewayResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

/// Decode a `generateContent` body into a tagged result.
///
/// # Errors
/// Returns an error if the body is not a JSON object of the expected shape.
pub fn parse_generate_response(body: &str) -> GatewayResult<GenerateResult> {
    let raw: GenerateContentResponse = serde_json::from_str(body)?;
    Ok(raw.into())
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> GatewayResult<GenerateResult> {
        let body = GenerateContentBody {
            contents: &request.contents,
            generation_config: &request.config,
        };

        tracing::debug!(
            model = %request.model,
            entries = request.contents.len(),
            "Gemini generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let result = parse_generate_response(&text)?;
        tracing::debug!(?result, "Gemini generateContent result");
        Ok(result)
    }
}
