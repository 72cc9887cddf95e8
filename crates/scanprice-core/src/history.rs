//! # History Collection
//!
//! The ordered, deduplicated list of previously viewed products.
//!
//! ## Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    History Invariants                                   │
//! │                                                                         │
//! │  front (newest)                                          back (oldest)  │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐                    │
//! │  │ 750105.. │ │ 301762.. │ │ 544900.. │ │ 841234.. │                    │
//! │  │ t=1700.. │≥│ t=1699.. │≥│ t=1698.. │≥│ t=1697.. │                    │
//! │  └──────────┘ └──────────┘ └──────────┘ └──────────┘                    │
//! │                                                                         │
//! │  • Uniqueness: at most one item per code                               │
//! │  • Ordering: timestamps never increase toward the back                 │
//! │    (kept by always inserting at the front, never by sorting)           │
//! │  • add(existing code) = remove old entry + insert fresh at front       │
//! │                                                                         │
//! │  Mutations: add / remove / clear. Nothing else touches `items`.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This type is pure: the caller supplies the clock. Persistence lives in
//! the app's `HistoryState`, which wraps this collection.

use std::collections::{HashSet, VecDeque};

use crate::types::{HistoryItem, PersistedHistory, Product};

/// Most-recent-first product history keyed by barcode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    items: VecDeque<HistoryItem>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        History {
            items: VecDeque::new(),
        }
    }

    /// Rebuilds a history from its persisted record.
    ///
    /// Stored order is kept as-is. Should the record contain the same code
    /// twice, the first (most recent) occurrence wins.
    pub fn from_persisted(record: PersistedHistory) -> Self {
        let mut seen = HashSet::new();
        let items = record
            .history
            .into_iter()
            .filter(|item| seen.insert(item.product.code.clone()))
            .collect();
        History { items }
    }

    /// Snapshot of the collection in its persisted shape.
    pub fn to_persisted(&self) -> PersistedHistory {
        PersistedHistory {
            history: self.items.iter().cloned().collect(),
        }
    }

    /// Adds a product at the front, promoting it if already present.
    ///
    /// ## Behavior
    /// - Any existing entry with the same code is removed first
    /// - The new item is stamped with `now_ms`, raised to the newest
    ///   existing timestamp if the clock went backwards
    /// - Never fails
    pub fn add(&mut self, product: Product, now_ms: i64) -> &HistoryItem {
        self.items.retain(|item| item.product.code != product.code);

        let newest = self.items.front().map_or(i64::MIN, |item| item.timestamp);
        let timestamp = now_ms.max(newest);

        self.items.push_front(HistoryItem::new(product, timestamp));
        &self.items[0]
    }

    /// Removes the entry for `code`. Absent codes are a no-op.
    pub fn remove(&mut self, code: &str) -> Option<HistoryItem> {
        let index = self.items.iter().position(|item| item.product.code == code)?;
        self.items.remove(index)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Looks up the entry for `code` without reordering anything.
    pub fn get(&self, code: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.product.code == code)
    }

    /// Most recent entry.
    pub fn first(&self) -> Option<&HistoryItem> {
        self.items.front()
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    /// Owned copy of the entries, newest first.
    pub fn to_vec(&self) -> Vec<HistoryItem> {
        self.items.iter().cloned().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the history is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
