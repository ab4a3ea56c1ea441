use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-user mutual exclusion for read-modify-write sequences.
///
/// Holding the guard returned by [`acquire`](Self::acquire) across a
/// get-check-store span serializes all operations on that user; operations
/// on different users proceed in parallel. The registry grows with the set
/// of users seen, one tiny entry each.
#[derive(Default)]
pub(crate) struct UserLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.inner.lock();
            Arc::clone(registry.entry(user.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let locks = Arc::new(UserLocks::new());
        let running = Arc::new(AtomicU32::new(0));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let running = Arc::clone(&running);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("alice").await;
                assert_eq!(running.fetch_add(1, Ordering::SeqCst), 0);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_users_do_not_block() {
        let locks = UserLocks::new();
        let _alice = locks.acquire("alice").await;
        // Must not deadlock while alice's guard is held.
        let _bob = locks.acquire("bob").await;
    }
}
