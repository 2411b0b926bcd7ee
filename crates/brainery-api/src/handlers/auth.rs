//! Auth handlers: login, logout, password reset.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::dto::request::{LoginRequest, ResetPasswordRequest};
use crate::dto::response::{IdentityResponse, LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((state.cookie_name().to_string(), value))
        .path("/")
        .http_only(true)
        .secure(state.config.session.cookie_secure)
        .same_site(SameSite::Lax)
        .build()
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let outcome = state
        .resolver
        .login(&req.email, &req.password, req.remember)
        .await?;

    let session = outcome.issued.session;
    let jar = jar.add(session_cookie(&state, outcome.issued.token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            landing: session.landing.path().to_string(),
            token: outcome.issued.token,
            csrf_token: session.csrf_token,
            expires_at: session.expires_at,
            user: IdentityResponse::from(outcome.identity),
        }),
    ))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthUser,
) -> (CookieJar, Json<MessageResponse>) {
    state.resolver.logout(&auth.session_id);
    let jar = jar.remove(session_cookie(&state, String::new()));
    (jar, Json(MessageResponse::new("You have been logged out.")))
}

/// POST /auth/reset_password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .resolver
        .reset_password(&req.email, &req.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset successful.")))
}
