use axum::body::Body;
use axum::http::Request;
use tracing::Span;
use uuid::Uuid;

/// Span factory for the HTTP trace layer. Every request gets a fresh id so
/// its log lines can be correlated.
pub fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %Uuid::new_v4(),
    )
}
