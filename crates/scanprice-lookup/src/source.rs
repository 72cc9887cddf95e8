//! # Product Source
//!
//! The transport seam of the lookup. A source performs exactly one request
//! and hands back the raw status and body; classification happens in
//! [`LookupService`](crate::service::LookupService).

use async_trait::async_trait;

use crate::error::LookupResult;

/// Raw HTTP answer from the product database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can fetch the product record for a barcode.
///
/// Implementations map transport failures (DNS, TLS, connection reset,
/// unreadable body) to [`LookupError::Unexpected`](crate::LookupError::Unexpected)
/// and return every HTTP response, successful or not, as a [`RawResponse`].
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetches the raw record for an already trimmed, non-empty code.
    async fn fetch_raw(&self, code: &str) -> LookupResult<RawResponse>;
}
