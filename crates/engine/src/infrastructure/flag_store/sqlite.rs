//! SQLite-backed flag storage.

use std::sync::Arc;

use async_trait::async_trait;
use condition_reminders_domain::common::merge_object;
use condition_reminders_domain::UserId;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{ClockPort, FlagStore, RepoError};

/// SQLite implementation of per-user flag storage.
///
/// Each `(user, namespace, key)` holds one JSON document. `set` reads, merges
/// and writes back inside a single transaction.
pub struct SqliteFlagStore {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteFlagStore {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("flags", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_flags (
                user_id TEXT NOT NULL,
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value_json TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, namespace, key)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("flags", e))?;

        Ok(Self { pool, clock })
    }
}

fn decode(json: &str) -> Result<Value, RepoError> {
    serde_json::from_str(json).map_err(|e| RepoError::Serialization(e.to_string()))
}

#[async_trait]
impl FlagStore for SqliteFlagStore {
    async fn get(
        &self,
        user_id: &UserId,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Value>, RepoError> {
        let row = sqlx::query(
            "SELECT value_json FROM user_flags WHERE user_id = ? AND namespace = ? AND key = ?",
        )
        .bind(user_id.as_str())
        .bind(namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("flags", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("value_json");
                decode(&json).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        user_id: &UserId,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("flags", e))?;

        let row = sqlx::query(
            "SELECT value_json FROM user_flags WHERE user_id = ? AND namespace = ? AND key = ?",
        )
        .bind(user_id.as_str())
        .bind(namespace)
        .bind(key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepoError::database("flags", e))?;

        let mut stored = match row {
            Some(row) => {
                let json: String = row.get("value_json");
                decode(&json)?
            }
            None => Value::Null,
        };
        merge_object(&mut stored, value);

        let json = serde_json::to_string(&stored).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO user_flags (user_id, namespace, key, value_json, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, namespace, key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id.as_str())
        .bind(namespace)
        .bind(key)
        .bind(json)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("flags", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("flags", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::Utc;
    use condition_reminders_domain::common::deletion_key;
    use serde_json::json;

    async fn store_in(dir: &tempfile::TempDir) -> SqliteFlagStore {
        let path = dir.path().join("flags.db");
        SqliteFlagStore::new(
            path.to_str().expect("utf-8 temp path"),
            Arc::new(FixedClock(Utc::now())),
        )
        .await
        .expect("open sqlite store")
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        let user = UserId::new("gm");

        store
            .set(&user, "ns", "conditions", json!({"a": {"label": "Stunned"}}))
            .await
            .unwrap();

        let value = store.get(&user, "ns", "conditions").await.unwrap();
        assert_eq!(value, Some(json!({"a": {"label": "Stunned"}})));
    }

    #[tokio::test]
    async fn test_set_merges_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        let user = UserId::new("gm");

        store
            .set(&user, "ns", "conditions", json!({"a": {"label": "A"}, "b": {"label": "B"}}))
            .await
            .unwrap();

        let mut patch = serde_json::Map::new();
        patch.insert(deletion_key("a"), Value::Null);
        patch.insert("b".to_string(), json!({"description": "bee"}));
        store
            .set(&user, "ns", "conditions", Value::Object(patch))
            .await
            .unwrap();

        let value = store.get(&user, "ns", "conditions").await.unwrap().unwrap();
        assert_eq!(value, json!({"b": {"label": "B", "description": "bee"}}));
    }

    #[tokio::test]
    async fn test_flags_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let user = UserId::new("gm");
        {
            let store = store_in(&dir).await;
            store
                .set(&user, "ns", "conditions", json!({"a": {}}))
                .await
                .unwrap();
        }

        let reopened = store_in(&dir).await;
        let value = reopened.get(&user, "ns", "conditions").await.unwrap();
        assert_eq!(value, Some(json!({"a": {}})));
    }
}
