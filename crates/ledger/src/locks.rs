//! Per-user serialization of ledger writes.
//!
//! Month N+1 of a user depends on month N, so two walks for the same user
//! must not interleave. Different users never share a lock.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct UserLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    /// Wait for exclusive access to `user_id`'s ledger.
    ///
    /// The guard releases the lock when dropped.
    pub(crate) async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Forget locks nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_user_waits() {
        let locks = Arc::new(UserLocks::default());
        let guard = locks.acquire("alice").await;

        let waiting = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("alice").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        waiting.await.unwrap();
    }

    #[tokio::test]
    async fn different_users_do_not_block() {
        let locks = UserLocks::default();
        let _alice = locks.acquire("alice").await;
        let _bob = locks.acquire("bob").await;
        assert_eq!(locks.tracked(), 2);
    }

    #[tokio::test]
    async fn released_locks_are_pruned() {
        let locks = UserLocks::default();
        drop(locks.acquire("alice").await);
        drop(locks.acquire("bob").await);
        assert_eq!(locks.tracked(), 1);
    }
}
