//! Session store: per-user conversation history.

use std::future::Future;
use std::pin::Pin;

use dashmap::DashMap;

use crate::session::types::{History, Speaker, Turn, UserId};
use crate::session::{SessionError, SessionResult};

/// Boxed future type for session store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Session store trait.
///
/// Implementations own every user's history. The in-memory store is the only
/// one shipped; a durable backend can be plugged in behind the same contract.
pub trait SessionStore: Send + Sync {
    /// Return the history for `user_id`, registering an empty one if absent.
    fn get_or_create<'a>(&'a self, user_id: &'a UserId) -> StoreFuture<'a, History>;

    /// Append `turn` to the end of `user_id`'s history.
    ///
    /// # Errors
    /// Returns [`SessionError::UnknownUser`] if the history was never created.
    fn append<'a>(
        &'a self,
        user_id: &'a UserId,
        turn: Turn,
    ) -> StoreFuture<'a, SessionResult<()>>;

    /// Read-only snapshot of a user's history, if known.
    fn history<'a>(&'a self, user_id: &'a UserId) -> StoreFuture<'a, Option<History>>;

    /// Produce a fresh identifier. Does not register it.
    fn issue_id(&self) -> UserId {
        UserId::random()
    }

    /// Number of users with a registered history.
    fn len(&self) -> usize;

    /// Whether no user has a registered history.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime in-memory store.
pub struct InMemorySessionStore {
    sessions: DashMap<UserId, History>,
    max_turns: Option<usize>,
}

impl InMemorySessionStore {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            max_turns: None,
        }
    }

    /// Create a store that keeps at most `max_turns` turns per user.
    #[must_use]
    pub fn with_max_turns(max_turns: Option<usize>) -> Self {
        Self {
            sessions: DashMap::new(),
            max_turns,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create<'a>(&'a self, user_id: &'a UserId) -> StoreFuture<'a, History> {
        Box::pin(async move {
            self.sessions
                .entry(user_id.clone())
                .or_insert_with(|| {
                    tracing::debug!(user_id = %user_id, "registering new session");
                    History::new()
                })
                .value()
                .clone()
        })
    }

    fn append<'a>(
        &'a self,
        user_id: &'a UserId,
        turn: Turn,
    ) -> StoreFuture<'a, SessionResult<()>> {
        Box::pin(async move {
            let mut history = self
                .sessions
                .get_mut(user_id)
                .ok_or_else(|| SessionError::UnknownUser(user_id.clone()))?;
            history.push(turn);
            if let Some(cap) = self.max_turns {
                truncate_oldest(&mut history, cap);
            }
            Ok(())
        })
    }

    fn history<'a>(&'a self, user_id: &'a UserId) -> StoreFuture<'a, Option<History>> {
        Box::pin(async move { self.sessions.get(user_id).map(|h| h.value().clone()) })
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// Drop the oldest turns beyond `cap`, then any leading model turn so the
/// retained history still opens with the user.
fn truncate_oldest(history: &mut History, cap: usize) {
    if history.len() > cap {
        let excess = history.len() - cap;
        history.drain(..excess);
    }
    while history.len() > 1 && history.first().is_some_and(|t| t.role() == Speaker::Model) {
        history.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_registers_empty_history() {
        let store = InMemorySessionStore::new();
        let user = UserId::new("u1");

        assert!(store.history(&user).await.is_none());
        let history = store.get_or_create(&user).await;
        assert!(history.is_empty());
        assert_eq!(store.len(), 1);
        assert_eq!(store.history(&user).await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_append_requires_existing_history() {
        let store = InMemorySessionStore::new();
        let user = UserId::new("ghost");

        let result = store.append(&user, Turn::user("hi")).await;
        assert!(matches!(result, Err(SessionError::UnknownUser(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_append_keeps_insertion_order() {
        let store = InMemorySessionStore::new();
        let user = UserId::new("u1");
        store.get_or_create(&user).await;

        for text in ["a", "b", "c"] {
            assert!(store.append(&user, Turn::user(text)).await.is_ok());
        }

        let contents: Vec<String> = store
            .history(&user)
            .await
            .unwrap_or_default()
            .iter()
            .map(|t| t.content().to_string())
            .collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing_history() {
        let store = InMemorySessionStore::new();
        let user = UserId::new("u1");
        store.get_or_create(&user).await;
        assert!(store.append(&user, Turn::user("kept")).await.is_ok());

        let history = store.get_or_create(&user).await;
        assert_eq!(history.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_issue_id_does_not_register() {
        let store = InMemorySessionStore::new();
        let a = store.issue_id();
        let b = store.issue_id();
        assert_ne!(a, b);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_turn_cap_keeps_newest_and_starts_with_user() {
        let store = InMemorySessionStore::with_max_turns(Some(3));
        let user = UserId::new("u1");
        store.get_or_create(&user).await;

        for i in 0..4 {
            assert!(store.append(&user, Turn::user(format!("q{i}"))).await.is_ok());
            assert!(store.append(&user, Turn::model(format!("a{i}"))).await.is_ok());
            let len = store.history(&user).await.map_or(0, |h| h.len());
            assert!(len <= 3);
        }

        let history = store.history(&user).await.unwrap_or_default();
        assert_eq!(history.first().map(Turn::role), Some(Speaker::User));
        assert_eq!(history.last().map(Turn::content), Some("a3"));
    }

    #[test]
    fn test_truncate_drops_leading_model_turn() {
        let mut history = vec![
            Turn::user("q0"),
            Turn::model("a0"),
            Turn::user("q1"),
            Turn::model("a1"),
        ];
        truncate_oldest(&mut history, 3);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content(), "q1");
    }
}
