//! # Repository Module
//!
//! Database repository implementations for ScanPrice.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HistoryState writer task                                              │
//! │       │                                                                 │
//! │       │  backend.save(&snapshot)                                       │
//! │       ▼                                                                 │
//! │  HistoryRepository            ← typed: PersistedHistory <-> JSON       │
//! │       │                                                                 │
//! │       │  kv.put(key, json)                                             │
//! │       ▼                                                                 │
//! │  KeyValueRepository           ← untyped: key -> text                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kv_store table                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`KeyValueRepository`](kv::KeyValueRepository) - Raw key-value records
//! - [`HistoryRepository`](history::HistoryRepository) - The search history record

pub mod history;
pub mod kv;
