//! In-memory flag storage.

use std::collections::HashMap;

use async_trait::async_trait;
use condition_reminders_domain::common::merge_object;
use condition_reminders_domain::UserId;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{FlagStore, RepoError};

type FlagKey = (UserId, String, String);

/// Flags held for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryFlagStore {
    flags: RwLock<HashMap<FlagKey, Value>>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(user_id: &UserId, namespace: &str, key: &str) -> FlagKey {
        (user_id.clone(), namespace.to_string(), key.to_string())
    }
}

#[async_trait]
impl FlagStore for InMemoryFlagStore {
    async fn get(
        &self,
        user_id: &UserId,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Value>, RepoError> {
        let flags = self.flags.read().await;
        Ok(flags.get(&Self::key(user_id, namespace, key)).cloned())
    }

    async fn set(
        &self,
        user_id: &UserId,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), RepoError> {
        let mut flags = self.flags.write().await;
        let stored = flags
            .entry(Self::key(user_id, namespace, key))
            .or_insert(Value::Null);
        merge_object(stored, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condition_reminders_domain::common::deletion_key;
    use serde_json::json;

    fn gm() -> UserId {
        UserId::new("gm")
    }

    #[tokio::test]
    async fn test_get_missing_flag_returns_none() {
        let store = InMemoryFlagStore::new();
        let value = store.get(&gm(), "ns", "conditions").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_set_merges_into_existing_document() {
        let store = InMemoryFlagStore::new();
        store
            .set(&gm(), "ns", "conditions", json!({"a": {"label": "one"}}))
            .await
            .unwrap();
        store
            .set(&gm(), "ns", "conditions", json!({"b": {"label": "two"}}))
            .await
            .unwrap();

        let value = store.get(&gm(), "ns", "conditions").await.unwrap().unwrap();
        assert_eq!(value, json!({"a": {"label": "one"}, "b": {"label": "two"}}));
    }

    #[tokio::test]
    async fn test_deletion_key_removes_entry() {
        let store = InMemoryFlagStore::new();
        store
            .set(&gm(), "ns", "conditions", json!({"a": {}, "b": {}}))
            .await
            .unwrap();

        let mut patch = serde_json::Map::new();
        patch.insert(deletion_key("a"), Value::Null);
        store
            .set(&gm(), "ns", "conditions", Value::Object(patch))
            .await
            .unwrap();

        let value = store.get(&gm(), "ns", "conditions").await.unwrap().unwrap();
        assert_eq!(value, json!({"b": {}}));
    }

    #[tokio::test]
    async fn test_flags_are_scoped_per_user() {
        let store = InMemoryFlagStore::new();
        store
            .set(&gm(), "ns", "conditions", json!({"a": {}}))
            .await
            .unwrap();

        let other = store
            .get(&UserId::new("player"), "ns", "conditions")
            .await
            .unwrap();
        assert!(other.is_none());
    }
}
