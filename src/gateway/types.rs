//! Wire shapes shared by every generative-model backend.

use serde::{Deserialize, Serialize};

use crate::session::{Speaker, Turn};

/// Output format requested from the provider.
pub const PLAIN_TEXT_MIME: &str = "text/plain";

/// One text fragment of a message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Text payload. Non-text parts (function calls, inline data) carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Build a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Text of this part, empty when absent.
    #[must_use]
    pub fn as_text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// One entry of the outbound conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Provider role string (`user` or `model`).
    pub role: String,
    /// Message parts.
    pub parts: Vec<Part>,
}

impl Content {
    /// Single-part entry for `role`.
    #[must_use]
    pub fn new(role: Speaker, text: impl Into<String>) -> Self {
        Self {
            role: role.as_str().to_string(),
            parts: vec![Part::text(text)],
        }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Self::new(turn.role(), turn.content())
    }
}

/// Generation settings sent with every call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type of the requested output.
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            response_mime_type: PLAIN_TEXT_MIME.to_string(),
        }
    }
}

/// A full generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Model identifier, e.g. `gemini-2.0-flash`.
    pub model: String,
    /// Generation settings.
    pub config: GenerationConfig,
    /// Ordered conversation entries, preamble first.
    pub contents: Vec<Content>,
}

/// One candidate completion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate body; the provider omits it when a candidate is blocked.
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

impl Candidate {
    /// Candidate made of the given text parts.
    #[must_use]
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: Some(CandidateContent {
                parts: texts.into_iter().map(Part::text).collect(),
            }),
        }
    }

    /// Parts of this candidate, empty when absent.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        self.content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }
}

/// Body of a candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateContent {
    /// Text parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Provider result, tagged by the shape it arrived in.
///
/// Which shape a given provider response takes is not a documented contract;
/// the client maps whatever it receives onto one of these variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateResult {
    /// A direct list of text parts.
    Parts(Vec<Part>),
    /// A list of candidate completions.
    Candidates(Vec<Candidate>),
    /// Neither shape was present.
    Empty,
}
