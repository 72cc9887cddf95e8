//! # Session Commands
//!
//! View switching and the session summary.

use tracing::debug;

use scanprice_core::ActiveView;

use crate::state::{Session, SessionState};

pub fn show_view(session: &SessionState, view: ActiveView) {
    debug!(%view, "show_view command");
    session.set_view(view);
}

/// Current session, for status display.
pub fn session_status(session: &SessionState) -> Session {
    session.snapshot()
}
