//! Conversation data model: identifiers, speakers and turns.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque user identifier.
///
/// Caller-supplied values are trusted as-is; server-issued values are random
/// `UUIDv4` strings so they carry no timestamp and are not derived from input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh random identifier.
    #[inline]
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a caller-supplied identifier without validation.
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow as `&str`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into `String`.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Who produced a turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The human on the other end of `/chat`.
    User,
    /// The generative model.
    Model,
}

impl Speaker {
    /// Role string understood by the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation. Immutable once built.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    role: Speaker,
    content: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Build a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Speaker::User, content)
    }

    /// Build a model turn.
    #[must_use]
    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Speaker::Model, content)
    }

    /// Build a turn for an arbitrary speaker.
    #[must_use]
    pub fn new(role: Speaker, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Speaker of this turn.
    #[must_use]
    pub const fn role(&self) -> Speaker {
        self.role
    }

    /// Text of this turn.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered turns for one user; insertion order is conversational order.
pub type History = Vec<Turn>;
