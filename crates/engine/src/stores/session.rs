//! Session state for the connected host user.

use std::sync::atomic::{AtomicBool, Ordering};

use condition_reminders_domain::UserId;
use tokio::sync::RwLock;

/// The user the host session is running as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub is_gm: bool,
}

/// Session store for use cases.
#[derive(Default)]
pub struct SessionStore {
    user: RwLock<Option<SessionUser>>,
    reconciled: AtomicBool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the acting user. A different user starts a fresh session.
    pub async fn set_user(&self, user: SessionUser) {
        let mut current = self.user.write().await;
        if current.as_ref().map(|u| &u.user_id) != Some(&user.user_id) {
            self.reconciled.store(false, Ordering::SeqCst);
        }
        *current = Some(user);
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.user.read().await.clone()
    }

    /// Claim the session's single reconciliation pass.
    ///
    /// Returns `true` exactly once per session.
    pub fn claim_reconciliation(&self) -> bool {
        !self.reconciled.swap(true, Ordering::SeqCst)
    }

    /// Give the claim back after a failed pass so a later event can retry.
    pub fn release_reconciliation(&self) {
        self.reconciled.store(false, Ordering::SeqCst);
    }
}
