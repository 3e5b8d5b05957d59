//! Request ID propagation for health probes and passed-through requests.
//!
//! Every request gets an id: the caller's `x-request-id` when it sends a
//! usable one, a fresh UUID v4 otherwise. The id tags the request span so
//! all log lines can be correlated, and is echoed back in the response's
//! `x-request-id` header so a prober can match its logs against ours.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest caller-supplied id we accept
const MAX_REQUEST_ID_LEN: usize = 128;

/// The caller's id if it is short, non-empty visible ASCII.
fn incoming_request_id(request: &Request) -> Option<HeaderValue> {
    let value = request.headers().get(&X_REQUEST_ID)?;
    let text = value.to_str().ok()?;
    let usable = !text.is_empty()
        && text.len() <= MAX_REQUEST_ID_LEN
        && text.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| value.clone())
}

/// Tags the request with an id, logs its completion and echoes the id.
///
/// Install as the outermost layer so the span also covers the health
/// responder.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(|| {
        // A hyphenated UUID is always a valid header value
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("invalid"))
    });

    let span = tracing::info_span!(
        "request",
        request_id = request_id.to_str().unwrap_or_default(),
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
            .headers_mut()
            .insert(X_REQUEST_ID.clone(), request_id);
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    fn request_with_id(id: &str) -> Request {
        http::Request::builder()
            .uri("/")
            .header("x-request-id", id)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_incoming_id_is_reused() {
        let request = request_with_id("lb-42");
        assert_eq!(incoming_request_id(&request).unwrap(), "lb-42");
    }

    #[test]
    fn test_unusable_incoming_ids_are_ignored() {
        assert!(incoming_request_id(&request_with_id("")).is_none());
        assert!(incoming_request_id(&request_with_id("has space")).is_none());
        assert!(incoming_request_id(&request_with_id(&"x".repeat(129))).is_none());

        let request = http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        assert!(incoming_request_id(&request).is_none());
    }
}
