//! # History State
//!
//! The in-memory search history plus its write-behind persistence.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    History Mutation Flow                                │
//! │                                                                         │
//! │  add / remove / clear                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock History ──► mutate ──► snapshot ──► channel ──► unlock           │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                   writer task (one per app)            │
//! │                                   backend.save(snapshot)               │
//! │                                   Err → error! log, dropped            │
//! │                                                                         │
//! │  The caller never waits on storage. Snapshots are queued while the     │
//! │  lock is held, so the writer sees them in mutation order and the last  │
//! │  write always matches the in-memory history.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use scanprice_core::{History, HistoryItem, PersistedHistory, Product};
use scanprice_store::HistoryBackend;

enum WriterCommand {
    Save(PersistedHistory),
    Flush(oneshot::Sender<()>),
}

/// Shared handle to the search history.
///
/// Cheap to clone; all clones see the same history and the same writer.
#[derive(Clone)]
pub struct HistoryState {
    history: Arc<Mutex<History>>,
    writer: mpsc::UnboundedSender<WriterCommand>,
}

impl std::fmt::Debug for HistoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryState")
            .field("len", &self.len())
            .finish()
    }
}

impl HistoryState {
    /// Loads the stored history once and starts the writer task.
    ///
    /// ## Startup Behavior
    /// - No record yet: empty history
    /// - Record unreadable or corrupt: logged, empty history
    ///
    /// Must be called inside a Tokio runtime.
    pub async fn hydrate(backend: Arc<dyn HistoryBackend>) -> Self {
        let history = match backend.load().await {
            Ok(Some(record)) => {
                let history = History::from_persisted(record);
                info!(items = history.len(), "Search history loaded");
                history
            }
            Ok(None) => {
                debug!("No stored search history, starting empty");
                History::new()
            }
            Err(e) => {
                warn!(error = %e, "Stored search history unusable, starting empty");
                History::new()
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(backend, rx));

        HistoryState {
            history: Arc::new(Mutex::new(history)),
            writer: tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the history, then queues a snapshot for storage.
    fn mutate<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut History) -> R,
    {
        let mut history = self.lock();
        let result = f(&mut history);

        if self
            .writer
            .send(WriterCommand::Save(history.to_persisted()))
            .is_err()
        {
            warn!("History writer stopped, change kept in memory only");
        }

        result
    }

    /// Adds or promotes a product, stamped with the current time.
    pub fn add(&self, product: Product) -> HistoryItem {
        let now_ms = Utc::now().timestamp_millis();
        self.mutate(|history| history.add(product, now_ms).clone())
    }

    /// Removes the entry for `code`, if any.
    pub fn remove(&self, code: &str) -> Option<HistoryItem> {
        self.mutate(|history| history.remove(code))
    }

    /// Empties the history.
    pub fn clear(&self) {
        self.mutate(History::clear)
    }

    /// Looks up an entry without changing the order.
    pub fn select(&self, code: &str) -> Option<HistoryItem> {
        self.lock().get(code).cloned()
    }

    /// All entries, most recent first.
    pub fn items(&self) -> Vec<HistoryItem> {
        self.lock().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Waits until every snapshot queued so far has been handed to storage.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.writer.send(WriterCommand::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run_writer(
    backend: Arc<dyn HistoryBackend>,
    mut commands: mpsc::UnboundedReceiver<WriterCommand>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            WriterCommand::Save(record) => {
                if let Err(e) = backend.save(&record).await {
                    error!(
                        error = %e,
                        items = record.history.len(),
                        "Failed to persist search history"
                    );
                } else {
                    debug!(items = record.history.len(), "Search history persisted");
                }
            }
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("History writer stopped");
}
