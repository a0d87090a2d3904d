use std::fmt;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Correlation header read from clients and echoed on every response
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one HTTP exchange.
///
/// Handlers receive it through `Extension<RequestId>` and attach it to their
/// log events; the trace span and the response header carry the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0.hyphenated().to_string()).ok()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Picks the id for an incoming request: the client's `x-request-id` when it
/// parses as a UUID, a new v4 id otherwise.
pub fn resolve_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .map_or_else(RequestId::fresh, RequestId)
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(value) = request_id.header_value() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Span factory for `TraceLayer`; runs after `request_id_middleware` has tagged the request
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    );
    if let Some(request_id) = request.extensions().get::<RequestId>() {
        span.record("request_id", tracing::field::display(request_id));
    }
    span
}
