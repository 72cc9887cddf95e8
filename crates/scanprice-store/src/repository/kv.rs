//! # Key-Value Repository
//!
//! Whole-value reads and writes against the `kv_store` table.
//! Every write replaces the previous value for its key.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;

/// Repository for raw key-value records.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Reads the value stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(Some(value))` - Key present
    /// * `Ok(None)` - Key never written
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();

        debug!(key = %key, bytes = value.len(), "Writing record");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Time of the last write to `key`, as stored (RFC 3339).
    pub async fn updated_at(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT updated_at FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.kv().get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        kv.put("k", "first").await.unwrap();
        kv.put("k", "second").await.unwrap();

        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("second"));
        assert!(kv.updated_at("k").await.unwrap().is_some());
        assert_eq!(kv.updated_at("other").await.unwrap(), None);
    }
}
