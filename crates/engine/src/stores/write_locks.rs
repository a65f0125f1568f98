//! Per-user write locks for registry read-modify-write cycles.

use std::sync::Arc;

use condition_reminders_domain::UserId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per owning user.
///
/// Hold the guard across fetch, compute and write so two mutations of the
/// same registry never interleave. Different users never contend.
#[derive(Default)]
pub struct UserWriteLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserWriteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the DashMap shard isn't held across the await
        let lock = self
            .locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_waits_for_guard() {
        let locks = Arc::new(UserWriteLocks::new());
        let user = UserId::new("gm");

        let guard = locks.lock(&user).await;
        let contender = {
            let locks = locks.clone();
            let user = user.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(&user).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_users_do_not_contend() {
        let locks = UserWriteLocks::new();
        let _gm = locks.lock(&UserId::new("gm")).await;

        tokio::time::timeout(Duration::from_millis(100), locks.lock(&UserId::new("player")))
            .await
            .expect("other user's lock should be free");
    }
}
