//! # Terminal Rendering
//!
//! Turns products, history and session state into terminal text.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Leche Gloria                                 │
//! │ Gloria · Dairies                             │
//! │ PEN 42.00                                    │
//! │ image  https://images.openfoodfacts.org/...  │
//! │ page   https://world.openfoodfacts.org/...   │
//! └──────────────────────────────────────────────┘
//! ```

use std::fmt::Write;

use colored::Colorize;

use scanprice_core::{HistoryItem, Product};

use crate::commands::StorageStatus;
use crate::error::ApiError;
use crate::state::{LookupStatus, Session};

/// Shown when the history has no entries.
pub const EMPTY_HISTORY: &str = "No products in history yet";

/// Product card for the scan view.
pub fn product_card(product: &Product, page_base_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.product_name.bold());
    let _ = writeln!(
        out,
        "{} · {}",
        product.brands.dimmed(),
        product.primary_category().dimmed()
    );
    let _ = writeln!(out, "{}", product.formatted_price().green().bold());
    if let Some(image) = product.display_image() {
        let _ = writeln!(out, "image  {}", image);
    }
    let _ = writeln!(out, "page   {}", product.product_page_url(page_base_url));
    let _ = write!(out, "code   {}", product.code);
    out
}

/// History list, most recent first.
pub fn history_list(items: &[HistoryItem]) -> String {
    if items.is_empty() {
        return EMPTY_HISTORY.dimmed().to_string();
    }

    items
        .iter()
        .map(|item| {
            format!(
                "{}  {:<13}  {}  {}",
                item.time_label().dimmed(),
                item.code(),
                item.product.formatted_price().green(),
                item.product.product_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Session summary line, followed by the last error if any.
pub fn session_line(session: &Session) -> String {
    let status = match session.status {
        LookupStatus::Idle => "idle".normal(),
        LookupStatus::Pending => "pending".yellow(),
        LookupStatus::Error => "error".red(),
    };
    let current = session
        .current_product
        .as_ref()
        .map_or("none", |p| p.code.as_str());

    let mut line = format!(
        "view: {}  status: {}  scanner: {}  current: {}",
        session.active_view,
        status,
        if session.scanner_open { "open" } else { "closed" },
        current
    );
    if let Some(err) = &session.last_error {
        let _ = write!(line, "\n{}", api_error(err));
    }
    line
}

/// Storage health line for `status`.
pub fn storage_line(status: &StorageStatus) -> String {
    match status {
        StorageStatus::Memory => format!("storage: {}", "memory only".yellow()),
        StorageStatus::Healthy {
            migrations_applied,
            migrations_total,
            last_saved,
        } => format!(
            "storage: {}  migrations: {}/{}  saved: {}",
            "ok".green(),
            migrations_applied,
            migrations_total,
            last_saved.as_deref().unwrap_or("never")
        ),
        StorageStatus::Unhealthy(reason) => format!("storage: {} {}", "down".red(), reason),
    }
}

/// Inline error text.
pub fn api_error(err: &ApiError) -> String {
    format!("{} {}", "✗".red().bold(), err.message.red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_product_card_fields() {
        let product = Product::new("7501055363803", 42)
            .with_name(Some("Leche Gloria"))
            .with_brands(Some("Gloria"))
            .with_categories(Some("Dairies, Milks"))
            .with_images(None, Some("https://img.example/front.jpg".into()));

        let card = product_card(&product, "https://world.openfoodfacts.org/product/");

        assert!(card.contains("Leche Gloria"));
        assert!(card.contains("Dairies"));
        assert!(!card.contains("Milks"));
        assert!(card.contains("PEN 42.00"));
        assert!(card.contains("https://img.example/front.jpg"));
        assert!(card.contains("https://world.openfoodfacts.org/product/7501055363803"));
    }

    #[test]
    fn test_card_without_image() {
        let card = product_card(&Product::new("7501055363803", 5), "https://x.test/product");
        assert!(!card.contains("image"));
        assert!(card.contains("Unknown Product"));
    }

    #[test]
    fn test_history_list() {
        assert!(history_list(&[]).contains(EMPTY_HISTORY));

        let items = vec![
            HistoryItem::new(Product::new("3017620422003", 40).with_name(Some("Nutella")), 2),
            HistoryItem::new(Product::new("7501055363803", 12).with_name(Some("Leche")), 1),
        ];
        let text = history_list(&items);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Nutella"));
        assert!(lines[1].contains("PEN 12.00"));
    }

    #[test]
    fn test_session_line() {
        let line = session_line(&Session::default());
        assert!(line.contains("view: scan"));
        assert!(line.contains("current: none"));
        assert_eq!(line.lines().count(), 1);

        let failed = Session {
            status: LookupStatus::Error,
            last_error: Some(ApiError::new(
                ErrorCode::NetworkError,
                "Failed to fetch product data",
            )),
            ..Session::default()
        };
        let line = session_line(&failed);
        assert!(line.contains("Failed to fetch product data"));
    }

    #[test]
    fn test_storage_line() {
        let line = storage_line(&StorageStatus::Healthy {
            migrations_applied: 1,
            migrations_total: 1,
            last_saved: None,
        });
        assert!(line.contains("migrations: 1/1"));
        assert!(line.contains("saved: never"));

        assert!(storage_line(&StorageStatus::Memory).contains("memory only"));
        assert!(storage_line(&StorageStatus::Unhealthy("gone".into())).contains("gone"));
    }

    #[test]
    fn test_api_error_text() {
        let text = api_error(&ApiError::new(ErrorCode::NotFound, "Product not found"));
        assert!(text.contains("Product not found"));
    }
}
