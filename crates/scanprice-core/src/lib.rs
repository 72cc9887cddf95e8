//! # scanprice-core: Pure Domain Logic for ScanPrice
//!
//! This crate is the **heart** of ScanPrice. It contains the product model,
//! the history collection rules and barcode validation as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ScanPrice Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Terminal Front End (apps/cli)                │   │
//! │  │    Search ──► Product Card ──► History List ──► AR Manifest     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ scanprice-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  history  │  │  pricing  │  │ validation│  │   │
//! │  │   │  Product  │  │  History  │  │ simulated │  │  barcode  │  │   │
//! │  │   │HistoryItem│  │ dedupe/MRU│  │   price   │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                │                                   │                    │
//! │  ┌─────────────▼─────────────┐     ┌───────────────▼───────────────┐   │
//! │  │  scanprice-store (SQLite) │     │  scanprice-lookup (HTTP)      │   │
//! │  └───────────────────────────┘     └───────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, HistoryItem, PersistedHistory)
//! - [`history`] - Ordered, deduplicated history collection
//! - [`pricing`] - Simulated price generation
//! - [`error`] - Domain error types
//! - [`validation`] - Barcode input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use scanprice_core::history::History;
//! use scanprice_core::types::Product;
//!
//! let mut history = History::new();
//! history.add(Product::new("7501055363803", 42), 1_000);
//! history.add(Product::new("7501055363803", 42), 2_000);
//!
//! // Still one entry, promoted with the newer timestamp
//! assert_eq!(history.len(), 1);
//! assert_eq!(history.get("7501055363803").unwrap().timestamp, 2_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod history;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use history::History;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency attached to every product.
///
/// Prices are simulated, so a single fixed currency is used system-wide.
pub const CURRENCY: &str = "PEN";

/// Display fallback for a product without a name.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Display fallback for a product without a brand.
pub const UNKNOWN_BRAND: &str = "Unknown Brand";

/// Display fallback for a product without categories.
pub const DEFAULT_CATEGORY: &str = "General";

/// Lowest simulated price (inclusive).
pub const PRICE_MIN: u32 = 5;

/// Highest simulated price (inclusive).
pub const PRICE_MAX: u32 = 150;

/// Shortest accepted manual barcode (EAN-8 and shorter internal codes).
pub const MIN_BARCODE_LEN: usize = 6;

/// Longest accepted manual barcode (EAN-13).
pub const MAX_BARCODE_LEN: usize = 13;

/// Storage key under which the history record is persisted.
pub const HISTORY_STORAGE_KEY: &str = "barcode-scanner-storage";
