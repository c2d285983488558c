//! Request-id middleware.
//!
//! Honors an `x-request-id` header from a trusted proxy when it looks sane,
//! otherwise generates a fresh id. The id is stored in request extensions for
//! handlers and echoed on the response for clients.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use logging::RequestId;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assign a request id and echo it back on the response.
pub async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(RequestId::from_header)
        .unwrap_or_default();

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}
