//! Service banner and fallback handlers.

use axum::http::StatusCode;

/// Plain-text banner naming the service and its version.
pub async fn index() -> String {
    format!(
        "{} {}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Anything the responder and the routes above did not claim.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
