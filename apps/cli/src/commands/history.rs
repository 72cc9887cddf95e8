//! # History Commands
//!
//! List, re-open, remove and clear past lookups. None of these touch the
//! network, and none of them change the current product except `select`.

use tracing::{debug, info};

use scanprice_core::{CoreError, HistoryItem};

use crate::error::ApiError;
use crate::state::{HistoryState, SessionState};

/// All history entries, most recent first.
pub fn list_history(history: &HistoryState) -> Vec<HistoryItem> {
    debug!("list_history command");
    history.items()
}

/// Re-opens a past lookup.
///
/// ## Behavior
/// - The stored product is shown as-is: its price is not re-simulated
/// - The entry moves to the front with a fresh timestamp
/// - The view switches to scan
pub fn select_history_item(
    history: &HistoryState,
    session: &SessionState,
    code: &str,
) -> Result<HistoryItem, ApiError> {
    debug!(code = %code, "select_history_item command");

    let item = history
        .select(code)
        .ok_or_else(|| CoreError::HistoryItemNotFound(code.to_string()))?;

    let promoted = history.add(item.product);
    session.show_product(promoted.product.clone());
    Ok(promoted)
}

/// Removes one entry. The current product is left alone.
///
/// ## Returns
/// The removed entry, or `None` when `code` was not in the history (a
/// no-op, not an error).
pub fn remove_history_item(history: &HistoryState, code: &str) -> Option<HistoryItem> {
    debug!(code = %code, "remove_history_item command");

    let removed = history.remove(code);
    match &removed {
        Some(_) => info!(code = %code, "History item removed"),
        None => debug!(code = %code, "Nothing to remove"),
    }
    removed
}

/// Empties the history. Returns how many entries were dropped.
pub fn clear_history(history: &HistoryState) -> usize {
    let count = history.len();
    history.clear();
    info!(count, "History cleared");
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use scanprice_core::{ActiveView, Product};
    use scanprice_store::MemoryHistoryBackend;
    use std::sync::Arc;

    async fn seeded() -> (HistoryState, SessionState) {
        let history = HistoryState::hydrate(Arc::new(MemoryHistoryBackend::new())).await;
        history.add(Product::new("7501055363803", 12).with_name(Some("Leche")));
        history.add(Product::new("3017620422003", 40).with_name(Some("Nutella")));
        (history, SessionState::new())
    }

    #[tokio::test]
    async fn test_select_promotes_with_frozen_price() {
        let (history, session) = seeded().await;
        session.set_view(ActiveView::History);
        let before = history.select("7501055363803").unwrap();

        let item = select_history_item(&history, &session, "7501055363803").unwrap();

        assert_eq!(item.product.price, 12);
        assert!(item.timestamp >= before.timestamp);
        assert_eq!(list_history(&history)[0].code(), "7501055363803");
        assert_eq!(history.len(), 2);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.current_product, Some(item.product));
        assert_eq!(snapshot.active_view, ActiveView::Scan);
    }

    #[tokio::test]
    async fn test_select_unknown_code() {
        let (history, session) = seeded().await;

        let err = select_history_item(&history, &session, "0000000000000").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(session.current_product().is_none());
    }

    #[tokio::test]
    async fn test_remove_and_clear_keep_current_product() {
        let (history, session) = seeded().await;
        select_history_item(&history, &session, "3017620422003").unwrap();

        remove_history_item(&history, "3017620422003").unwrap();
        assert_eq!(history.len(), 1);
        assert!(remove_history_item(&history, "3017620422003").is_none());
        assert_eq!(history.len(), 1);

        assert_eq!(clear_history(&history), 1);
        assert!(history.is_empty());
        assert_eq!(session.current_product().unwrap().code, "3017620422003");
    }
}
