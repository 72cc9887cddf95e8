//! # History Repository
//!
//! Loads and saves the search history as one JSON document under a fixed
//! key, the way browser local storage holds it:
//!
//! ```text
//! kv_store
//! ┌───────────────────────────┬──────────────────────────────────────────┐
//! │ key                       │ value                                    │
//! ├───────────────────────────┼──────────────────────────────────────────┤
//! │ barcode-scanner-storage   │ {"history":[{"code":"750..",...},...]}   │
//! └───────────────────────────┴──────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use scanprice_core::PersistedHistory;
use tracing::debug;

use crate::backend::HistoryBackend;
use crate::error::{StoreError, StoreResult};
use crate::repository::kv::KeyValueRepository;

/// SQLite-backed history record.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    kv: KeyValueRepository,
    key: String,
}

impl HistoryRepository {
    /// Creates a repository storing the history under `key`.
    pub fn new(kv: KeyValueRepository, key: impl Into<String>) -> Self {
        HistoryRepository {
            kv,
            key: key.into(),
        }
    }

    /// Storage key of the record.
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl HistoryBackend for HistoryRepository {
    async fn load(&self) -> StoreResult<Option<PersistedHistory>> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            debug!(key = %self.key, "No stored history");
            return Ok(None);
        };

        let record =
            PersistedHistory::from_json(&raw).map_err(|e| StoreError::corrupt(&self.key, e))?;

        debug!(key = %self.key, items = record.history.len(), "Loaded history");
        Ok(Some(record))
    }

    async fn save(&self, record: &PersistedHistory) -> StoreResult<()> {
        let json = record
            .to_json()
            .map_err(|e| StoreError::corrupt(&self.key, e))?;
        self.kv.put(&self.key, &json).await
    }
}
