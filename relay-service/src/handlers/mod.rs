//! HTTP handlers for the relay service.

pub mod analyze;
pub mod health;

use axum::http::Uri;
use service_core::error::AppError;

/// Catch-all for unknown paths and unsupported methods on known paths.
pub async fn not_found(uri: Uri) -> AppError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    tracing::debug!(path = %path, "No route matched");
    AppError::NotFound(path)
}
