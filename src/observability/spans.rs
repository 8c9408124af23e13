//! Request spans.
//!
//! Every request gets an `http_request` span carrying the method, path and
//! the request ID assigned by `http::request`, so log lines from one request
//! can be correlated.

use axum::http::Request;
use tracing::Span;

use crate::http::request::X_REQUEST_ID;

/// Span factory for `tower_http::trace::TraceLayer`.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
