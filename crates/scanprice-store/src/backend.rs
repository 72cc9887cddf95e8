//! # History Backend
//!
//! The seam between the app's history state and durable storage.
//!
//! ```text
//! HistoryBackend
//!   ├── HistoryRepository      SQLite kv_store (normal runs)
//!   └── MemoryHistoryBackend   process memory (--ephemeral, tests)
//! ```
//!
//! Implementations only move whole records. Ordering of writes is the
//! caller's job (the app funnels them through a single writer task).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scanprice_core::PersistedHistory;

use crate::error::{StoreError, StoreResult};

/// Durable home of the history record.
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Reads the stored record. `Ok(None)` on first run.
    async fn load(&self) -> StoreResult<Option<PersistedHistory>>;

    /// Replaces the stored record.
    async fn save(&self, record: &PersistedHistory) -> StoreResult<()>;
}

/// Backend that keeps the record in memory.
///
/// Clones share the same slot, so a test can keep one handle to inspect
/// what the app wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryBackend {
    slot: Arc<Mutex<Option<PersistedHistory>>>,
}

impl MemoryHistoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stored record.
    pub fn snapshot(&self) -> Option<PersistedHistory> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

#[async_trait]
impl HistoryBackend for MemoryHistoryBackend {
    async fn load(&self) -> StoreResult<Option<PersistedHistory>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::Internal(format!("Lock poisoned: {}", e)))?;
        Ok(slot.clone())
    }

    async fn save(&self, record: &PersistedHistory) -> StoreResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::Internal(format!("Lock poisoned: {}", e)))?;
        *slot = Some(record.clone());
        Ok(())
    }
}
