//! Per-session handlers: who am I, pending notices.

use axum::Json;
use axum::extract::State;

use brainery_auth::session::Notice;

use crate::dto::response::MeResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /me
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth.identity_id.to_string(),
        username: auth.username.clone(),
        email: auth.email.clone(),
        role: auth.role.to_string(),
        is_admin: auth.is_admin(),
    })
}

/// GET /notices
///
/// Drains the queue: each notice is delivered once.
pub async fn notices(State(state): State<AppState>, auth: AuthUser) -> Json<Vec<Notice>> {
    Json(state.resolver.take_notices(&auth.session_id))
}
