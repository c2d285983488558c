//! Bearer-token authorization middleware.
//!
//! Verifies the access token on protected routes and exposes the subject to
//! handlers via request extensions. Missing and invalid tokens get the same
//! envelope-shaped 401.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use error::{DomainError, ServiceResult};
use logging::RequestId;

use crate::AppState;

/// Subject extracted from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User id the token was issued for.
    pub id: String,
}

/// Reject the request with the standard unauthorized envelope.
fn unauthorized(urid: Option<String>) -> Response {
    ServiceResult::<()>::rejected(urid, DomainError::NoAuthorizationToken).into_response()
}

/// Extract the Bearer token from an Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}

/// Authorization middleware for protected routes.
pub async fn authorize(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let urid = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_string());

    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return unauthorized(urid);
    };

    let Some(token) = extract_bearer_token(auth_header) else {
        return unauthorized(urid);
    };

    let claims = match auth::tokens::verify(&state.tokens, token) {
        Ok(claims) => claims,
        Err(_) => return unauthorized(urid),
    };

    request.extensions_mut().insert(AuthenticatedUser { id: claims.uid });

    next.run(request).await
}
