//! # scanprice-lookup: Product Database Client
//!
//! Turns a barcode into a normalized [`Product`](scanprice_core::Product)
//! or a classified [`LookupError`]. One request per lookup, no retries.
//!
//! ## Lookup Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       fetch_product(code)                               │
//! │                                                                         │
//! │  code.trim() empty? ──────────────────────────► Validation             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductSource::fetch_raw ── transport failure ► Unexpected            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  non-2xx status? ─────────────────────────────► Network                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse JSON ── malformed ─────────────────────► Unexpected             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status == 0 or no product? ──────────────────► NotFound               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize fields + simulate price ───────────► Ok(Product)            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Endpoint, timeout and user agent settings
//! - [`source`] - The transport seam ([`ProductSource`])
//! - [`client`] - Open Food Facts over `reqwest`
//! - [`payload`] - Wire format and normalization
//! - [`service`] - The lookup lifecycle above
//! - [`error`] - Lookup error taxonomy

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod service;
pub mod source;

pub use client::OpenFoodFactsClient;
pub use config::LookupConfig;
pub use error::{LookupError, LookupResult, FETCH_FAILED_MESSAGE, NOT_FOUND_MESSAGE};
pub use service::LookupService;
pub use source::{ProductSource, RawResponse};
