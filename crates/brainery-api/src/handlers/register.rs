//! Registration handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use brainery_service::Registration;

use crate::dto::request::CheckEmailRequest;
use crate::dto::response::{CheckEmailResponse, IdentityResponse, RegisterResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<Registration>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let identity = state.resolver.register(&form).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful! Please log in.".to_string(),
            user: IdentityResponse::from(identity),
        }),
    ))
}

/// POST /check_email
pub async fn check_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CheckEmailRequest>,
) -> Result<Json<CheckEmailResponse>, ApiError> {
    let exists = state.resolver.email_exists(&req.email).await?;
    let message = if exists {
        "This email is already registered. Try logging in instead."
    } else {
        "Email available."
    };
    Ok(Json(CheckEmailResponse {
        exists,
        message: message.to_string(),
    }))
}
