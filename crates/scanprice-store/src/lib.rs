//! # scanprice-store: Local Persistence for ScanPrice
//!
//! This crate provides durable local storage for ScanPrice.
//! It uses SQLite as a key-value store with sqlx for async operations,
//! standing in for the browser's local storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ScanPrice Persistence Flow                        │
//! │                                                                         │
//! │  HistoryState (app) ── writer task ── save(snapshot)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  scanprice-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ kv.rs          │   │  (embedded)  │  │   │
//! │  │   │               │◄───│ history.rs     │   │ 001_kv.sql   │  │   │
//! │  │   │ SqlitePool    │    └────────────────┘   └──────────────┘  │   │
//! │  │   └───────────────┘                                            │   │
//! │  │                    HistoryBackend trait (backend.rs)            │   │
//! │  │                    ├── HistoryRepository  (SQLite)              │   │
//! │  │                    └── MemoryHistoryBackend (ephemeral/tests)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/scanprice/scanprice.db                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Key-value and history repositories
//! - [`backend`] - The persistence seam used by the app
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scanprice_store::{Database, DbConfig, HistoryBackend};
//!
//! let db = Database::new(DbConfig::new("path/to/scanprice.db")).await?;
//! let repo = db.history("barcode-scanner-storage");
//!
//! let record = repo.load().await?.unwrap_or_default();
//! repo.save(&record).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{HistoryBackend, MemoryHistoryBackend};
pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::history::HistoryRepository;
pub use repository::kv::KeyValueRepository;
