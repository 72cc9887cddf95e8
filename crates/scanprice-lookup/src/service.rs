//! # Lookup Service
//!
//! One call, one request, one `Product` or one classified error.

use std::sync::Arc;

use scanprice_core::pricing::simulate_price;
use scanprice_core::validation::normalize_decoded_barcode;
use scanprice_core::Product;
use tracing::{debug, info, warn};

use crate::error::{LookupError, LookupResult};
use crate::payload::ProductResponse;
use crate::source::ProductSource;

/// Resolves barcodes through a [`ProductSource`].
#[derive(Clone)]
pub struct LookupService {
    source: Arc<dyn ProductSource>,
}

impl LookupService {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        LookupService { source }
    }

    /// Fetches and normalizes the product for `code`.
    ///
    /// ## Behavior
    /// 1. Trimmed empty code → `Validation`, nothing is sent
    /// 2. One request with the trimmed code
    /// 3. Non-2xx → `Network("Failed to fetch product data")`
    /// 4. Malformed body → `Unexpected`
    /// 5. `status == 0` or no product → `NotFound`
    /// 6. Otherwise a `Product` with a freshly simulated price
    ///
    /// No retries; two lookups of the same code yield two prices.
    pub async fn fetch_product(&self, code: &str) -> LookupResult<Product> {
        let code = normalize_decoded_barcode(code)?;
        debug!(code = %code, "Looking up product");

        let response = self.source.fetch_raw(&code).await?;

        if !response.is_success() {
            warn!(code = %code, status = response.status, "Product lookup failed");
            return Err(LookupError::http_status(response.status));
        }

        let payload = ProductResponse::from_json(&response.body)?;
        let price = simulate_price(&mut rand::thread_rng());
        let product = payload.into_product(&code, price)?;

        info!(
            code = %product.code,
            name = %product.product_name,
            price = product.price,
            "Product found"
        );
        Ok(product)
    }
}

impl std::fmt::Debug for LookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawResponse;
    use async_trait::async_trait;
    use scanprice_core::{CURRENCY, PRICE_MAX, PRICE_MIN, UNKNOWN_BRAND};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays one canned result and records requested codes.
    struct FakeSource {
        reply: LookupResult<RawResponse>,
        calls: AtomicUsize,
        last_code: Mutex<Option<String>>,
    }

    impl FakeSource {
        fn replying(reply: LookupResult<RawResponse>) -> Arc<Self> {
            Arc::new(FakeSource {
                reply,
                calls: AtomicUsize::new(0),
                last_code: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductSource for FakeSource {
        async fn fetch_raw(&self, code: &str) -> LookupResult<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_code.lock().unwrap() = Some(code.to_string());
            self.reply.clone()
        }
    }

    fn service(source: &Arc<FakeSource>) -> LookupService {
        LookupService::new(source.clone())
    }

    #[tokio::test]
    async fn test_found_product() {
        let source = FakeSource::replying(Ok(RawResponse::new(
            200,
            r#"{"status":1,"product":{"code":"7501055363803","product_name":"Leche"}}"#,
        )));

        let product = service(&source).fetch_product("7501055363803").await.unwrap();

        assert_eq!(product.code, "7501055363803");
        assert_eq!(product.product_name, "Leche");
        assert_eq!(product.brands, UNKNOWN_BRAND);
        assert!((PRICE_MIN..=PRICE_MAX).contains(&product.price));
        assert_eq!(product.currency, CURRENCY);
    }

    #[tokio::test]
    async fn test_not_found() {
        let source = FakeSource::replying(Ok(RawResponse::new(
            200,
            r#"{"code":"0000000000000","status":0}"#,
        )));

        let err = service(&source).fetch_product("0000000000000").await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_http_error_is_network_error() {
        let source = FakeSource::replying(Ok(RawResponse::new(502, "Bad Gateway")));

        let err = service(&source).fetch_product("7501055363803").await.unwrap_err();
        assert_eq!(err, LookupError::http_status(502));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_body_is_unexpected() {
        let source = FakeSource::replying(Ok(RawResponse::new(200, "{not json")));

        let err = service(&source).fetch_product("7501055363803").await.unwrap_err();
        assert!(matches!(err, LookupError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let source = FakeSource::replying(Err(LookupError::Unexpected("connection reset".into())));

        let err = service(&source).fetch_product("7501055363803").await.unwrap_err();
        assert_eq!(err, LookupError::Unexpected("connection reset".into()));
    }

    #[tokio::test]
    async fn test_blank_code_never_hits_network() {
        let source = FakeSource::replying(Ok(RawResponse::new(200, "{}")));

        let err = service(&source).fetch_product("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_code_is_trimmed_before_request() {
        let source = FakeSource::replying(Ok(RawResponse::new(
            200,
            r#"{"status":1,"product":{}}"#,
        )));

        let product = service(&source).fetch_product(" 123456\n").await.unwrap();

        assert_eq!(source.last_code.lock().unwrap().as_deref(), Some("123456"));
        assert_eq!(product.code, "123456");
        assert_eq!(source.calls(), 1);
    }
}
