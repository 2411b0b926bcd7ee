//! CSRF gate for cookie-authenticated mutations.
//!
//! A browser attaches the session cookie on its own, so a mutating request
//! authenticated by that cookie must also echo the session's CSRF token in
//! the `x-csrf-token` header. Bearer-authenticated and anonymous requests
//! pass through; the handlers decide whether they need a session at all.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use brainery_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::{SessionToken, TokenSource};
use crate::state::AppState;

/// Header carrying the CSRF token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Paths that never require the token.
const EXEMPT_PATHS: &[&str] = &["/check_email"];

fn is_mutating(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Rejects cookie-authenticated mutations whose CSRF header does not match
/// the session.
pub async fn require_csrf(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !is_mutating(request.method()) || EXEMPT_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let token = SessionToken::from_headers(request.headers(), state.cookie_name());
    let Some(token) = token.filter(|t| t.source == TokenSource::Cookie) else {
        return next.run(request).await;
    };

    // An unknown cookie is not a session; the session gate answers that.
    let Some((_, session)) = state.sessions.authenticate(&token.token) else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok());
    if presented != Some(session.csrf_token.as_str()) {
        warn!(
            session_id = %session.id,
            path = %request.uri().path(),
            "CSRF check failed"
        );
        return ApiError::from(AppError::csrf_rejected()).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_methods_pass() {
        assert!(!is_mutating(&Method::GET));
        assert!(!is_mutating(&Method::OPTIONS));
        assert!(is_mutating(&Method::POST));
        assert!(is_mutating(&Method::DELETE));
    }
}
