//! # Lookup Commands
//!
//! Barcode in, product on screen.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Lookup Lifecycle                                     │
//! │                                                                         │
//! │  typed code ──► validate ──✗──► inline VALIDATION_ERROR (no state)     │
//! │                    │                                                    │
//! │  decoded code ─────┤                                                    │
//! │                    ▼                                                    │
//! │              begin_lookup ──✗──► LOOKUP_IN_PROGRESS                     │
//! │                    │            (scanner closes, error clears)          │
//! │                    ▼                                                    │
//! │              fetch_product                                              │
//! │               │         │                                               │
//! │            Ok │         │ Err                                           │
//! │               ▼         ▼                                               │
//! │     history.add      complete_failure (current product cleared)        │
//! │     complete_success notifier.error  (history untouched)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use scanprice_core::validation::{normalize_decoded_barcode, validate_manual_barcode};
use scanprice_core::Product;
use scanprice_lookup::LookupService;

use crate::error::ApiError;
use crate::notify::Notifier;
use crate::scanner::{BarcodeDecoder, ScannerConfig, ScannerSession};
use crate::state::{HistoryState, SessionState};

/// Looks up a barcode typed by the user.
///
/// ## Validation
/// Input that is not 6-13 digits is rejected inline: no request, no
/// notification, session untouched.
pub async fn submit_manual_code(
    lookup: &LookupService,
    session: &SessionState,
    history: &HistoryState,
    notifier: &dyn Notifier,
    input: &str,
) -> Result<Product, ApiError> {
    let code = validate_manual_barcode(input)?;
    run_lookup(lookup, session, history, notifier, &code).await
}

/// Looks up a barcode produced by the scanner. Decoder output is trusted.
pub async fn submit_scanned_code(
    lookup: &LookupService,
    session: &SessionState,
    history: &HistoryState,
    notifier: &dyn Notifier,
    text: &str,
) -> Result<Product, ApiError> {
    let code = normalize_decoded_barcode(text)?;
    run_lookup(lookup, session, history, notifier, &code).await
}

/// Opens the scanner, waits for one barcode and looks it up.
///
/// A device that cannot be started is reported as `CAMERA_ERROR`; the
/// overlay stays open so the user can retry. A device that closes before
/// producing a code is reported the same way, with the overlay closed.
pub async fn scan_and_lookup<D: BarcodeDecoder>(
    scanner: &mut ScannerSession<D>,
    config: &ScannerConfig,
    lookup: &LookupService,
    session: &SessionState,
    history: &HistoryState,
    notifier: &dyn Notifier,
) -> Result<Product, ApiError> {
    session.open_scanner();

    if let Err(e) = scanner.start(config).await {
        let err = ApiError::from(e);
        notifier.error(&err.message);
        return Err(err);
    }

    let text = match scanner.next_code().await {
        Ok(text) => text,
        Err(e) => {
            session.close_scanner();
            let err = ApiError::from(e);
            notifier.error(&err.message);
            return Err(err);
        }
    };

    submit_scanned_code(lookup, session, history, notifier, &text).await
}

async fn run_lookup(
    lookup: &LookupService,
    session: &SessionState,
    history: &HistoryState,
    notifier: &dyn Notifier,
    code: &str,
) -> Result<Product, ApiError> {
    session.begin_lookup()?;
    debug!(code = %code, "Lookup started");

    match lookup.fetch_product(code).await {
        Ok(product) => {
            history.add(product.clone());
            session.complete_success(product.clone());
            info!(code = %product.code, price = product.price, "Lookup complete");
            Ok(product)
        }
        Err(e) => {
            let err = ApiError::from(e);
            session.complete_failure(err.clone());
            notifier.error(&err.message);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{found, harness, not_found, Harness, StubSource};
    use crate::error::ErrorCode;
    use crate::notify::tests::RecordingNotifier;
    use crate::notify::NoOpNotifier;
    use crate::scanner::tests::FakeDecoder;
    use crate::scanner::ScanEvent;
    use crate::state::LookupStatus;
    use scanprice_core::{ActiveView, CURRENCY, UNKNOWN_BRAND};
    use scanprice_lookup::RawResponse;
    use std::sync::Arc;
    use tokio::sync::Notify;

    async fn manual(
        h: &Harness,
        notifier: &dyn Notifier,
        input: &str,
    ) -> Result<Product, ApiError> {
        submit_manual_code(&h.lookup, &h.session, &h.history, notifier, input).await
    }

    async fn scan<D: BarcodeDecoder>(
        h: &Harness,
        scanner: &mut ScannerSession<D>,
        notifier: &dyn Notifier,
    ) -> Result<Product, ApiError> {
        let config = ScannerConfig::default();
        scan_and_lookup(scanner, &config, &h.lookup, &h.session, &h.history, notifier).await
    }

    #[tokio::test]
    async fn test_found_product_lands_in_history() {
        let h = harness(StubSource::new(vec![found("7501055363803", "Leche")])).await;
        let notifier = RecordingNotifier::default();
        h.session.set_view(ActiveView::History);

        let product = manual(&h, &notifier, " 7501055363803 ").await.unwrap();

        assert_eq!(product.code, "7501055363803");
        assert_eq!(product.product_name, "Leche");
        assert_eq!(product.brands, UNKNOWN_BRAND);
        assert_eq!(product.currency, CURRENCY);
        assert!((5..=150).contains(&product.price));

        assert_eq!(h.history.items()[0].product, product);

        let session = h.session.snapshot();
        assert_eq!(session.current_product, Some(product));
        assert_eq!(session.status, LookupStatus::Idle);
        assert_eq!(session.active_view, ActiveView::Scan);
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_leaves_history_untouched() {
        let h = harness(StubSource::new(vec![
            found("7501055363803", "Leche"),
            not_found(),
        ]))
        .await;
        let notifier = RecordingNotifier::default();

        manual(&h, &notifier, "7501055363803").await.unwrap();
        let before = h.history.items();

        let err = manual(&h, &notifier, "0000000000000").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found");
        assert_eq!(h.history.items(), before);
        assert!(h.session.current_product().is_none());
        assert_eq!(h.session.status(), LookupStatus::Error);
        assert_eq!(notifier.errors(), vec!["Product not found"]);
    }

    #[tokio::test]
    async fn test_http_failure_is_network_error() {
        let h = harness(StubSource::new(vec![Ok(RawResponse::new(503, "busy"))])).await;

        let err = manual(&h, &NoOpNotifier, "7501055363803").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(err.message, "Failed to fetch product data");
        assert!(h.history.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_manual_input_sends_nothing() {
        let h = harness(StubSource::default()).await;
        let notifier = RecordingNotifier::default();

        for input in ["", "   ", "123", "75010553638031", "75010x5536380"] {
            let err = manual(&h, &notifier, input).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "input {:?}", input);
        }

        assert_eq!(h.source.calls(), 0);
        assert_eq!(h.session.snapshot(), Default::default());
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_scanned_code_skips_digit_rules() {
        let h = harness(StubSource::new(vec![found("ABC-123", "Loose item")])).await;

        let product =
            submit_scanned_code(&h.lookup, &h.session, &h.history, &NoOpNotifier, "ABC-123\r\n")
                .await
                .unwrap();
        assert_eq!(product.code, "ABC-123");
        assert_eq!(h.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_submission_rejected_while_pending() {
        let gate = Arc::new(Notify::new());
        let h = harness(StubSource::gated(
            vec![found("7501055363803", "Leche")],
            gate.clone(),
        ))
        .await;

        let first = manual(&h, &NoOpNotifier, "7501055363803");
        let second = async {
            let result = manual(&h, &NoOpNotifier, "3017620422003").await;
            gate.notify_one();
            result
        };

        let (first, second) = tokio::join!(first, second);

        assert_eq!(second.unwrap_err().code, ErrorCode::LookupInProgress);
        assert_eq!(first.unwrap().code, "7501055363803");
        assert_eq!(h.source.calls(), 1);
        assert_eq!(h.history.len(), 1);
    }

    #[tokio::test]
    async fn test_scan_closes_overlay_and_looks_up() {
        let h = harness(StubSource::new(vec![found("7501055363803", "Leche")])).await;
        let decoder = FakeDecoder::new(vec![ScanEvent::Decoded("7501055363803".into())]);
        let mut scanner = ScannerSession::new(decoder);

        let product = scan(&h, &mut scanner, &NoOpNotifier).await.unwrap();

        assert_eq!(product.code, "7501055363803");
        assert!(!scanner.is_running());
        assert!(!h.session.snapshot().scanner_open);
    }

    #[tokio::test]
    async fn test_camera_failure_is_inline_and_retryable() {
        let h = harness(StubSource::new(vec![found("7501055363803", "Leche")])).await;
        let notifier = RecordingNotifier::default();
        let mut decoder = FakeDecoder::failing(1);
        decoder.script = vec![ScanEvent::Decoded("7501055363803".into())];
        let mut scanner = ScannerSession::new(decoder);

        let err = scan(&h, &mut scanner, &notifier).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CameraError);
        assert!(err.is_retryable());
        assert!(h.session.snapshot().scanner_open);
        assert_eq!(h.source.calls(), 0);
        assert_eq!(notifier.errors().len(), 1);

        scan(&h, &mut scanner, &notifier).await.unwrap();
        assert_eq!(h.history.len(), 1);
    }

    #[tokio::test]
    async fn test_scanner_closing_early_is_notified() {
        let h = harness(StubSource::default()).await;
        let notifier = RecordingNotifier::default();
        let device = tempfile::NamedTempFile::new().unwrap();
        let decoder = crate::scanner::SerialLineDecoder::new(Some(device.path().into()));
        let mut scanner = ScannerSession::new(decoder);

        let err = scan(&h, &mut scanner, &notifier).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::CameraError);
        assert_eq!(err.message, "Scanner closed before a barcode was read");
        assert_eq!(notifier.errors(), vec![err.message.clone()]);
        assert!(!h.session.snapshot().scanner_open);
        assert_eq!(h.source.calls(), 0);
    }
}
