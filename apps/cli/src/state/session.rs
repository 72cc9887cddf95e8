//! # Session State
//!
//! Everything the user sees that is not persisted: the current product,
//! the lookup status and the view flags. Resets on every start.
//!
//! ## Lookup Status
//! ```text
//!              begin_lookup()
//!   Idle ─────────────────────► Pending ──── begin_lookup() → LOOKUP_IN_PROGRESS
//!    ▲                           │    │
//!    │    complete_success()     │    │ complete_failure(err)
//!    └───────────────────────────┘    ▼
//!    ▲                              Error  (current product cleared)
//!    │          begin_lookup()        │
//!    └──── via Pending ◄──────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use scanprice_core::{ActiveView, Product};

use crate::error::ApiError;

/// Where the current lookup stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    #[default]
    Idle,
    Pending,
    Error,
}

impl std::fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupStatus::Idle => write!(f, "idle"),
            LookupStatus::Pending => write!(f, "pending"),
            LookupStatus::Error => write!(f, "error"),
        }
    }
}

/// Snapshot of the visible session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Product on the scan view, if any.
    pub current_product: Option<Product>,

    pub status: LookupStatus,

    /// Error from the last failed lookup, cleared on the next attempt.
    pub last_error: Option<ApiError>,

    pub active_view: ActiveView,

    /// Whether the scanner overlay is open.
    pub scanner_open: bool,
}

/// Shared handle to the session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current session, copied out.
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// Marks a lookup as started.
    ///
    /// ## Behavior
    /// - Rejected with `LOOKUP_IN_PROGRESS` while another lookup is pending
    /// - Closes the scanner overlay and clears the previous error
    pub fn begin_lookup(&self) -> Result<(), ApiError> {
        let mut session = self.lock();
        if session.status == LookupStatus::Pending {
            return Err(ApiError::lookup_in_progress());
        }
        session.status = LookupStatus::Pending;
        session.last_error = None;
        session.scanner_open = false;
        Ok(())
    }

    /// Shows the looked-up product on the scan view.
    pub fn complete_success(&self, product: Product) {
        let mut session = self.lock();
        session.current_product = Some(product);
        session.status = LookupStatus::Idle;
        session.last_error = None;
        session.active_view = ActiveView::Scan;
    }

    /// Records a failed lookup. The current product is cleared.
    pub fn complete_failure(&self, error: ApiError) {
        let mut session = self.lock();
        session.current_product = None;
        session.status = LookupStatus::Error;
        session.last_error = Some(error);
    }

    /// Shows a product picked from the history.
    pub fn show_product(&self, product: Product) {
        let mut session = self.lock();
        session.current_product = Some(product);
        session.active_view = ActiveView::Scan;
    }

    pub fn set_view(&self, view: ActiveView) {
        self.lock().active_view = view;
    }

    pub fn open_scanner(&self) {
        self.lock().scanner_open = true;
    }

    pub fn close_scanner(&self) {
        self.lock().scanner_open = false;
    }

    pub fn current_product(&self) -> Option<Product> {
        self.lock().current_product.clone()
    }

    pub fn status(&self) -> LookupStatus {
        self.lock().status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_initial_session() {
        let session = SessionState::new().snapshot();
        assert_eq!(session.status, LookupStatus::Idle);
        assert_eq!(session.active_view, ActiveView::Scan);
        assert!(session.current_product.is_none());
        assert!(!session.scanner_open);
    }

    #[test]
    fn test_second_lookup_rejected_while_pending() {
        let state = SessionState::new();
        state.begin_lookup().unwrap();

        let err = state.begin_lookup().unwrap_err();
        assert_eq!(err.code, ErrorCode::LookupInProgress);
        assert_eq!(state.status(), LookupStatus::Pending);
    }

    #[test]
    fn test_begin_closes_scanner() {
        let state = SessionState::new();
        state.open_scanner();
        state.begin_lookup().unwrap();
        assert!(!state.snapshot().scanner_open);
    }

    #[test]
    fn test_success_switches_to_scan_view() {
        let state = SessionState::new();
        state.set_view(ActiveView::History);
        state.begin_lookup().unwrap();
        state.complete_success(Product::new("7501055363803", 20));

        let session = state.snapshot();
        assert_eq!(session.status, LookupStatus::Idle);
        assert_eq!(session.active_view, ActiveView::Scan);
        assert_eq!(session.current_product.unwrap().code, "7501055363803");
    }

    #[test]
    fn test_failure_clears_current_product() {
        let state = SessionState::new();
        state.begin_lookup().unwrap();
        state.complete_success(Product::new("7501055363803", 20));

        state.begin_lookup().unwrap();
        state.complete_failure(ApiError::new(ErrorCode::NotFound, "Product not found"));

        let session = state.snapshot();
        assert_eq!(session.status, LookupStatus::Error);
        assert!(session.current_product.is_none());
        assert_eq!(session.last_error.unwrap().message, "Product not found");

        state.begin_lookup().unwrap();
        assert!(state.snapshot().last_error.is_none());
    }
}
