//! Repository port traits for persisted flags.

use async_trait::async_trait;
use condition_reminders_domain::UserId;
use serde_json::Value;

use super::error::RepoError;

// =============================================================================
// Flag Storage
// =============================================================================

/// Per-user key-value storage, namespaced by add-on.
///
/// `set` merges rather than replaces: objects merge key by key, other values
/// replace, and a `-=<key>` entry deletes `<key>`. Implementations apply
/// `condition_reminders_domain::common::merge_object` so every adapter agrees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlagStore: Send + Sync {
    async fn get(
        &self,
        user_id: &UserId,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Value>, RepoError>;

    async fn set(
        &self,
        user_id: &UserId,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), RepoError>;
}
