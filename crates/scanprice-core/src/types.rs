//! # Domain Types
//!
//! Core domain types used throughout ScanPrice.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Product      │   │  HistoryItem    │   │  PersistedHistory    │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  code           │◄──│  (flattened)    │◄──│  history: [..]       │  │
//! │  │  product_name   │   │  timestamp (ms) │   │                      │  │
//! │  │  brands         │   └─────────────────┘   │  the ONLY durable    │  │
//! │  │  categories     │                         │  record              │  │
//! │  │  image urls     │                         └──────────────────────┘  │
//! │  │  price/currency │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `Product` is a normalized snapshot: display fallbacks are applied once
//! at the lookup boundary, so nothing downstream deals with missing names.
//! Once wrapped in a `HistoryItem` the simulated price is frozen.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{CURRENCY, DEFAULT_CATEGORY, UNKNOWN_BRAND, UNKNOWN_PRODUCT_NAME};

// =============================================================================
// Product
// =============================================================================

/// A looked-up product, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Barcode as reported by the product database.
    pub code: String,

    /// Display name, "Unknown Product" when the database has none.
    pub product_name: String,

    /// Comma-separated brands, "Unknown Brand" when absent.
    pub brands: String,

    /// Comma-separated categories, "General" when absent.
    pub categories: String,

    /// Main product image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Front-of-pack image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_front_url: Option<String>,

    /// Simulated price in whole currency units.
    pub price: u32,

    /// Always [`CURRENCY`].
    pub currency: String,
}

impl Product {
    /// Creates a product with display fallbacks for every optional field.
    pub fn new(code: impl Into<String>, price: u32) -> Self {
        Product {
            code: code.into(),
            product_name: UNKNOWN_PRODUCT_NAME.to_string(),
            brands: UNKNOWN_BRAND.to_string(),
            categories: DEFAULT_CATEGORY.to_string(),
            image_url: None,
            image_front_url: None,
            price,
            currency: CURRENCY.to_string(),
        }
    }

    /// Sets the name, keeping the fallback when `name` is missing or blank.
    pub fn with_name(mut self, name: Option<&str>) -> Self {
        if let Some(name) = non_blank(name) {
            self.product_name = name.to_string();
        }
        self
    }

    /// Sets the brands, keeping the fallback when missing or blank.
    pub fn with_brands(mut self, brands: Option<&str>) -> Self {
        if let Some(brands) = non_blank(brands) {
            self.brands = brands.to_string();
        }
        self
    }

    /// Sets the categories, keeping the fallback when missing or blank.
    pub fn with_categories(mut self, categories: Option<&str>) -> Self {
        if let Some(categories) = non_blank(categories) {
            self.categories = categories.to_string();
        }
        self
    }

    /// Sets both image URLs as provided.
    pub fn with_images(
        mut self,
        image_url: Option<String>,
        image_front_url: Option<String>,
    ) -> Self {
        self.image_url = image_url;
        self.image_front_url = image_front_url;
        self
    }

    /// First category only, as shown on the product card.
    pub fn primary_category(&self) -> &str {
        self.categories
            .split(',')
            .map(str::trim)
            .find(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Image to display: the main image, else the front-of-pack one.
    pub fn display_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or(self.image_front_url.as_deref())
    }

    /// Price with currency, e.g. `PEN 42.00`.
    pub fn formatted_price(&self) -> String {
        format!("{} {}.00", self.currency, self.price)
    }

    /// Public product page on the product database website.
    pub fn product_page_url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.code)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// History Item
// =============================================================================

/// A product in the search history, stamped with when it was last viewed.
///
/// Serialized flat, product fields and `timestamp` side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(flatten)]
    pub product: Product,

    /// Epoch milliseconds when the item was added or re-selected.
    pub timestamp: i64,
}

impl HistoryItem {
    /// Wraps a product, freezing its price.
    pub fn new(product: Product, timestamp: i64) -> Self {
        HistoryItem { product, timestamp }
    }

    /// Barcode of the wrapped product.
    #[inline]
    pub fn code(&self) -> &str {
        &self.product.code
    }

    /// Timestamp as a UTC date-time.
    pub fn viewed_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Local `HH:MM` label for the history list.
    pub fn time_label(&self) -> String {
        self.viewed_at()
            .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    }
}

// =============================================================================
// Persisted History
// =============================================================================

/// The one durable record: `{ "history": [...] }`.
///
/// The currently displayed product and view flags are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedHistory {
    #[serde(default)]
    pub history: Vec<HistoryItem>,
}

impl PersistedHistory {
    /// Encodes the record as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a record written by [`PersistedHistory::to_json`].
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

// =============================================================================
// Active View
// =============================================================================

/// Which panel the front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    /// Search form and current product.
    #[default]
    Scan,
    /// Search history list.
    History,
}

impl std::fmt::Display for ActiveView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveView::Scan => write!(f, "scan"),
            ActiveView::History => write!(f, "history"),
        }
    }
}

impl std::str::FromStr for ActiveView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scan" | "search" => Ok(ActiveView::Scan),
            "history" => Ok(ActiveView::History),
            other => Err(format!(
                "Unknown view: '{}'. Valid options: scan, history",
                other
            )),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
