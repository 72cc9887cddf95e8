//! # State Module
//!
//! Separate state types instead of one `AppState`, so each command takes
//! exactly the state it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ HistoryState │  │ SessionState │  │    AppConfig     │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  lookup          │              │
//! │  │   History>>  │  │   Session>>  │  │  storage         │              │
//! │  │  + writer    │  │              │  │  scanner         │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • HistoryState: mutex held only for the in-memory change;             │
//! │    storage writes happen on the writer task                            │
//! │  • SessionState: mutex, never held across an await                     │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod history;
mod session;

pub use config::{AppConfig, StorageSettings, DATABASE_FILE_NAME};
pub use history::HistoryState;
pub use session::{LookupStatus, Session, SessionState};
