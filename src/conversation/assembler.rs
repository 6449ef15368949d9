//! Turn a user message into a model reply, keeping history in step.

use std::sync::Arc;

use chrono::Utc;

use crate::conversation::locks::UserLocks;
use crate::conversation::prompt::{ARTLINK_PREAMBLE, build_contents};
use crate::gateway::{GenerateRequest, GenerationConfig, GenerativeModel, normalize_reply};
use crate::session::{SessionStore, Turn, UserId};

/// Reply sent when the provider call fails.
pub const PROVIDER_ERROR_REPLY: &str = "There was an error connecting to Artlink Bot.";

/// How a `respond` call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyStatus {
    /// The model replied (possibly with a fallback text).
    Replied,
    /// The provider call failed; no model turn was stored.
    ProviderFailed,
}

/// Result of one conversational exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatOutcome {
    /// Text for the user.
    pub reply: String,
    /// Identifier the exchange was recorded under.
    pub user_id: UserId,
    /// Success or provider failure.
    pub status: ReplyStatus,
}

/// Conversation assembler: session store + preamble + provider.
pub struct ChatAssembler {
    store: Arc<dyn SessionStore>,
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    preamble: String,
    config: GenerationConfig,
    locks: UserLocks,
}

impl ChatAssembler {
    /// Create an assembler with the default preamble.
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        model: Arc<dyn GenerativeModel>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            model,
            model_name: model_name.into(),
            preamble: ARTLINK_PREAMBLE.to_string(),
            config: GenerationConfig::default(),
            locks: UserLocks::new(),
        }
    }

    /// Replace the preamble.
    #[must_use]
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Record `message` for `user_id` (issuing one if absent), ask the model,
    /// record and return its reply.
    ///
    /// Requests for the same user run one at a time. A provider failure keeps
    /// the user turn and returns [`PROVIDER_ERROR_REPLY`].
    pub async fn respond(&self, message: impl Into<String>, user_id: Option<UserId>) -> ChatOutcome {
        let user_id = user_id.unwrap_or_else(|| {
            let issued = self.store.issue_id();
            tracing::debug!(user_id = %issued, "issued new user id");
            issued
        });

        let _guard = self.locks.acquire(&user_id).await;

        self.store.get_or_create(&user_id).await;
        let user_turn = Turn::user(message);
        let asked_at = user_turn.created_at();
        if let Err(e) = self.store.append(&user_id, user_turn).await {
            tracing::error!(user_id = %user_id, "failed to record user turn: {e}");
            return failed(user_id);
        }

        let history = self.store.get_or_create(&user_id).await;
        let request = GenerateRequest {
            model: self.model_name.clone(),
            config: self.config.clone(),
            contents: build_contents(&self.preamble, &history),
        };

        let result = match self.model.generate(&request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    model = %self.model_name,
                    auth = e.is_auth(),
                    rate_limited = e.is_rate_limited(),
                    "provider error: {e}"
                );
                return failed(user_id);
            }
        };

        let reply = normalize_reply(&result);
        if let Err(e) = self.store.append(&user_id, Turn::model(reply.as_str())).await {
            tracing::error!(user_id = %user_id, "failed to record model turn: {e}");
            return failed(user_id);
        }

        let stored = self.store.history(&user_id).await.as_ref().map_or(0, Vec::len);
        tracing::debug!(
            user_id = %user_id,
            turns = stored,
            sessions = self.store.len(),
            elapsed_ms = (Utc::now() - asked_at).num_milliseconds(),
            "reply recorded"
        );

        ChatOutcome {
            reply,
            user_id,
            status: ReplyStatus::Replied,
        }
    }
}

fn failed(user_id: UserId) -> ChatOutcome {
    ChatOutcome {
        reply: PROVIDER_ERROR_REPLY.to_string(),
        user_id,
        status: ReplyStatus::ProviderFailed,
    }
}
