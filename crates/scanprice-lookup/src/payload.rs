//! # Wire Format
//!
//! The Open Food Facts v0 product response, and its normalization into a
//! [`Product`]. Optional and untyped fields stop here.
//!
//! ```json
//! { "status": 1,
//!   "product": { "code": "7501055363803", "product_name": "Leche",
//!                "brands": "...", "categories": "...",
//!                "image_url": "...", "image_front_url": "..." } }
//! ```

use scanprice_core::Product;
use serde::Deserialize;

use crate::error::{LookupError, LookupResult};

/// Top-level response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductResponse {
    /// 1 when found, 0 when not.
    #[serde(default)]
    pub status: Option<i64>,

    #[serde(default)]
    pub product: Option<RawProduct>,
}

/// Product fields as the database sends them. Anything may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brands: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_front_url: Option<String>,
}

impl ProductResponse {
    /// Parses a response body.
    pub fn from_json(body: &str) -> LookupResult<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Normalizes into a [`Product`] priced at `price`.
    ///
    /// `requested_code` stands in when the payload omits the product code.
    pub fn into_product(self, requested_code: &str, price: u32) -> LookupResult<Product> {
        let not_found = || LookupError::NotFound {
            code: requested_code.to_string(),
        };

        if self.status == Some(0) {
            return Err(not_found());
        }
        let raw = self.product.ok_or_else(not_found)?;

        let code = raw
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(requested_code)
            .to_string();

        Ok(Product::new(code, price)
            .with_name(raw.product_name.as_deref())
            .with_brands(raw.brands.as_deref())
            .with_categories(raw.categories.as_deref())
            .with_images(raw.image_url, raw.image_front_url))
    }
}
