//! `AuthUser` extractor: reads the session token, resolves it to the current
//! identity, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use brainery_core::error::AppError;
use brainery_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Where a session token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer …`
    Bearer,
    /// The session cookie, sent by the browser on its own.
    Cookie,
}

/// A raw session token taken from the request.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub source: TokenSource,
}

impl SessionToken {
    /// Bearer header first, then the session cookie.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Self> {
        let bearer = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if let Some(token) = bearer {
            return Some(Self {
                token: token.to_string(),
                source: TokenSource::Bearer,
            });
        }

        CookieJar::from_headers(headers)
            .get(cookie_name)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
            .map(|token| Self {
                token,
                source: TokenSource::Cookie,
            })
    }
}

/// Extracted authenticated identity available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = SessionToken::from_headers(&parts.headers, state.cookie_name())
            .ok_or_else(|| AppError::unauthenticated("Please log in to access this page."))?;

        let resolved = state
            .resolver
            .resolve_session(&token.token)
            .await
            .ok_or_else(|| AppError::unauthenticated("Session expired or invalid"))?;

        Ok(AuthUser(resolved.context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        headers.insert("cookie", HeaderValue::from_static("brainery_session=xyz"));
        let token = SessionToken::from_headers(&headers, "brainery_session").unwrap();
        assert_eq!(token.token, "abc");
        assert_eq!(token.source, TokenSource::Bearer);
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("other=1; brainery_session=xyz"));
        let token = SessionToken::from_headers(&headers, "brainery_session").unwrap();
        assert_eq!(token.token, "xyz");
        assert_eq!(token.source, TokenSource::Cookie);
        assert!(SessionToken::from_headers(&HeaderMap::new(), "brainery_session").is_none());
    }
}
