//! UI serving routes
//!
//! Serves the embedded single-page UI for the training tracker.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../ui/index.html");

/// GET /
///
/// Serves the main UI page (protected).
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
