//! # Storage Commands
//!
//! Diagnostics for the local history store, shown by `status`.

use tracing::{debug, warn};

use scanprice_store::migrations::migration_status;
use scanprice_store::Database;

/// Health of the history store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageStatus {
    /// `--ephemeral` run, nothing on disk.
    Memory,

    /// Database answers queries.
    Healthy {
        migrations_applied: usize,
        migrations_total: usize,
        /// RFC 3339 time of the last history write, `None` before the first.
        last_saved: Option<String>,
    },

    /// Database does not answer, or its schema is unreadable.
    Unhealthy(String),
}

/// Checks the store behind the history record `key`.
pub async fn storage_status(db: Option<&Database>, key: &str) -> StorageStatus {
    debug!("storage_status command");

    let Some(db) = db else {
        return StorageStatus::Memory;
    };

    if !db.health_check().await {
        return StorageStatus::Unhealthy("database is not answering".into());
    }

    let (migrations_total, migrations_applied) = match migration_status(db.pool()).await {
        Ok(counts) => counts,
        Err(e) => return StorageStatus::Unhealthy(e.to_string()),
    };

    let last_saved = db.kv().updated_at(key).await.unwrap_or_else(|e| {
        warn!(error = %e, "Could not read history timestamp");
        None
    });

    StorageStatus::Healthy {
        migrations_applied,
        migrations_total,
        last_saved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanprice_core::{History, Product, HISTORY_STORAGE_KEY};
    use scanprice_store::{DbConfig, HistoryBackend};

    #[tokio::test]
    async fn test_ephemeral_store() {
        assert_eq!(
            storage_status(None, HISTORY_STORAGE_KEY).await,
            StorageStatus::Memory
        );
    }

    #[tokio::test]
    async fn test_healthy_store_reports_last_save() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        match storage_status(Some(&db), HISTORY_STORAGE_KEY).await {
            StorageStatus::Healthy {
                migrations_applied,
                migrations_total,
                last_saved,
            } => {
                assert_eq!(migrations_applied, migrations_total);
                assert!(last_saved.is_none());
            }
            other => panic!("unexpected status {:?}", other),
        }

        let mut history = History::new();
        history.add(Product::new("7501055363803", 12), 1_000);
        db.history(HISTORY_STORAGE_KEY)
            .save(&history.to_persisted())
            .await
            .unwrap();

        let status = storage_status(Some(&db), HISTORY_STORAGE_KEY).await;
        assert!(matches!(
            status,
            StorageStatus::Healthy {
                last_saved: Some(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_closed_store_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(matches!(
            storage_status(Some(&db), HISTORY_STORAGE_KEY).await,
            StorageStatus::Unhealthy(_)
        ));
    }
}
