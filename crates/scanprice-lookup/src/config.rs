//! # Lookup Configuration
//!
//! Where the product database lives and how to talk to it.
//!
//! ## Configuration File Section
//! ```toml
//! [lookup]
//! api_base_url = "https://world.openfoodfacts.org/api/v0/product"
//! product_page_base_url = "https://world.openfoodfacts.org/product"
//! timeout_secs = 15        # optional, transport default when absent
//! user_agent = "scanprice/0.1.0"
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LookupError, LookupResult};

/// Default product API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://world.openfoodfacts.org/api/v0/product";

/// Default public product page base.
pub const DEFAULT_PRODUCT_PAGE_BASE_URL: &str = "https://world.openfoodfacts.org/product";

/// Product database client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL; requests go to `{api_base_url}/{code}.json`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the human-readable product pages.
    #[serde(default = "default_product_page_base_url")]
    pub product_page_base_url: String,

    /// Request timeout. `None` leaves the transport default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_product_page_base_url() -> String {
    DEFAULT_PRODUCT_PAGE_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("scanprice/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            api_base_url: default_api_base_url(),
            product_page_base_url: default_product_page_base_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl LookupConfig {
    /// Checks URLs and timeout.
    pub fn validate(&self) -> LookupResult<()> {
        parse_http_url("api_base_url", &self.api_base_url)?;
        parse_http_url("product_page_base_url", &self.product_page_base_url)?;

        if self.timeout_secs == Some(0) {
            return Err(LookupError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(LookupError::InvalidConfig("user_agent must not be empty".into()));
        }

        Ok(())
    }

    /// Parsed API base URL.
    pub fn api_base(&self) -> LookupResult<Url> {
        parse_http_url("api_base_url", &self.api_base_url)
    }
}

/// Parses `value` and requires an http(s) scheme with a host.
pub fn parse_http_url(field: &str, value: &str) -> LookupResult<Url> {
    let url = Url::parse(value)
        .map_err(|e| LookupError::InvalidConfig(format!("{} '{}': {}", field, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(LookupError::InvalidConfig(format!(
            "{} must use http or https, got: {}",
            field, value
        )));
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(LookupError::InvalidConfig(format!(
            "{} has no host: {}",
            field, value
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LookupConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_secs, None);
        assert!(config.user_agent.starts_with("scanprice/"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = LookupConfig::default();

        config.api_base_url = "ftp://example.org/api".into();
        assert!(config.validate().is_err());

        config.api_base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api_base_url = DEFAULT_API_BASE_URL.into();
        config.timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.timeout_secs = Some(5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: LookupConfig = toml::from_str("timeout_secs = 7").unwrap();
        assert_eq!(config.timeout_secs, Some(7));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.product_page_base_url, DEFAULT_PRODUCT_PAGE_BASE_URL);
    }
}
