//! # Commands Module
//!
//! Every user action, as a plain function over the state it needs.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Command Categories                               │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │  Lookup          │  │  History         │  │  Session         │      │
//! │  │  ─────────       │  │  ─────────       │  │  ─────────       │      │
//! │  │  submit_manual   │  │  list_history    │  │  show_view       │      │
//! │  │  submit_scanned  │  │  select_item     │  │  session_status  │      │
//! │  │  scan_and_lookup │  │  remove_item     │  │                  │      │
//! │  │                  │  │  clear_history   │  │                  │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐                            │
//! │  │  AR              │  │  Storage         │                            │
//! │  │  ─────────       │  │  ─────────       │                            │
//! │  │  menu_scene      │  │  storage_status  │                            │
//! │  │  apply_ar_event  │  │                  │                            │
//! │  │  capture_still   │  │                  │                            │
//! │  │  capture_frame   │  │                  │                            │
//! │  └──────────────────┘  └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands return `Result<T, ApiError>`. Rendering is the caller's job.

pub mod ar;
pub mod history;
pub mod lookup;
pub mod session;
pub mod storage;

pub use ar::*;
pub use history::*;
pub use lookup::*;
pub use session::*;
pub use storage::*;

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use scanprice_lookup::{LookupResult, LookupService, ProductSource, RawResponse};
    use scanprice_store::MemoryHistoryBackend;

    use crate::state::{HistoryState, SessionState};

    /// Replays canned responses in order, then answers 404.
    #[derive(Default)]
    pub(crate) struct StubSource {
        responses: Mutex<VecDeque<LookupResult<RawResponse>>>,
        pub calls: AtomicUsize,
        pub gate: Option<Arc<Notify>>,
    }

    impl StubSource {
        pub(crate) fn new(responses: Vec<LookupResult<RawResponse>>) -> Self {
            StubSource {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            }
        }

        /// Holds every request until `gate` is notified.
        pub(crate) fn gated(
            responses: Vec<LookupResult<RawResponse>>,
            gate: Arc<Notify>,
        ) -> Self {
            StubSource {
                gate: Some(gate),
                ..StubSource::new(responses)
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductSource for StubSource {
        async fn fetch_raw(&self, _code: &str) -> LookupResult<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawResponse::new(404, "")))
        }
    }

    pub(crate) fn found(code: &str, name: &str) -> LookupResult<RawResponse> {
        Ok(RawResponse::new(
            200,
            format!(
                r#"{{"status":1,"product":{{"code":"{}","product_name":"{}"}}}}"#,
                code, name
            ),
        ))
    }

    pub(crate) fn not_found() -> LookupResult<RawResponse> {
        Ok(RawResponse::new(
            200,
            r#"{"status":0,"status_verbose":"product not found"}"#,
        ))
    }

    pub(crate) struct Harness {
        pub source: Arc<StubSource>,
        pub lookup: LookupService,
        pub session: SessionState,
        pub history: HistoryState,
        pub backend: MemoryHistoryBackend,
    }

    pub(crate) async fn harness(source: StubSource) -> Harness {
        let source = Arc::new(source);
        let backend = MemoryHistoryBackend::new();
        Harness {
            lookup: LookupService::new(source.clone()),
            source,
            session: SessionState::new(),
            history: HistoryState::hydrate(Arc::new(backend.clone())).await,
            backend,
        }
    }
}
