//! Per-request trace ids
//!
//! The middleware opens a `request` span carrying a fresh id and keeps the id
//! in a task-local for the lifetime of the request, so error responses built
//! deep inside a handler can report it.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

tokio::task_local! {
    static TRACE_ID: String;
}

pub fn generate() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Trace id of the request being served, or a fresh one outside a request.
pub fn current() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| generate())
}

pub async fn assign_trace_id(req: Request<Body>, next: Next) -> Response {
    let trace_id = generate();
    let span = tracing::info_span!(
        "request",
        trace_id = %trace_id,
        method = %req.method(),
        uri = %req.uri(),
    );

    let mut response = TRACE_ID
        .scope(trace_id.clone(), next.run(req).instrument(span))
        .await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response
            .headers_mut()
            .entry(HeaderName::from_static(TRACE_ID_HEADER))
            .or_insert(value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_32_hex() {
        let id = generate();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_current_inside_scope() {
        let seen = TRACE_ID
            .scope("abc".to_string(), async { current() })
            .await;
        assert_eq!(seen, "abc");
        assert_ne!(current(), "abc");
    }
}
