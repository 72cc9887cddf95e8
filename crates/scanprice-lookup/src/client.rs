//! # Open Food Facts Client
//!
//! Production [`ProductSource`] backed by `reqwest`.
//!
//! ```text
//! GET {api_base_url}/{code}.json
//! User-Agent: scanprice/x.y.z
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::LookupConfig;
use crate::error::{LookupError, LookupResult};
use crate::source::{ProductSource, RawResponse};

/// HTTP client for the Open Food Facts product API.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    http: Client,
    base: Url,
}

impl OpenFoodFactsClient {
    /// Builds a client from validated settings.
    ///
    /// ## Errors
    /// `InvalidConfig` if the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &LookupConfig) -> LookupResult<Self> {
        let base = config.api_base()?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| LookupError::InvalidConfig(format!("HTTP client: {}", e)))?;

        info!(base = %base, timeout_secs = ?config.timeout_secs, "Product lookup client ready");

        Ok(OpenFoodFactsClient { http, base })
    }

    /// Request URL for `code`. The code is percent-encoded as one path
    /// segment, so decoder output with odd characters cannot escape it.
    pub fn product_url(&self, code: &str) -> LookupResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidConfig(format!("cannot append to {}", self.base)))?
            .pop_if_empty()
            .push(&format!("{}.json", code));
        Ok(url)
    }
}

#[async_trait]
impl ProductSource for OpenFoodFactsClient {
    async fn fetch_raw(&self, code: &str) -> LookupResult<RawResponse> {
        let url = self.product_url(code)?;
        debug!(url = %url, "Requesting product");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| {
                LookupError::Unexpected(format!("Could not reach product database: {}", e))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Unexpected(format!("Could not read product data: {}", e)))?;

        debug!(status, bytes = body.len(), "Product response received");
        Ok(RawResponse { status, body })
    }
}
