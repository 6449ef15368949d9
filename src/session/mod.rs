//! Per-user session state.

pub mod store;
pub mod types;

pub use store::{InMemorySessionStore, SessionStore, StoreFuture};
pub use types::{History, Speaker, Turn, UserId};

use thiserror::Error;

/// Session store errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Append called before the user's history was created.
    #[error("no session registered for user {0}")]
    UnknownUser(UserId),
}

/// Convenience result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
