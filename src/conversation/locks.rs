//! Per-user mutual exclusion.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::session::UserId;

/// Table of async mutexes keyed by user.
///
/// Holding a user's guard serializes every request for that user; waiters
/// are woken in arrival order.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`.
    pub async fn acquire(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        lock.lock_owned().await
    }

    /// Number of users that ever held a lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no lock was ever taken.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_is_exclusive() {
        let locks = UserLocks::new();
        let user = UserId::new("u1");

        let guard = locks.acquire(&user).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&user)).await;
        assert!(second.is_err());

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&user)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_distinct_users_do_not_block() {
        let locks = UserLocks::new();
        let _a = locks.acquire(&UserId::new("a")).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&UserId::new("b"))).await;
        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }
}
