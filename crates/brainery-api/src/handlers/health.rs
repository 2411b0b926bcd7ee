//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /health
///
/// Round-trips to the store; a failure answers 503.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.stores.health.ping().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        backend: state.stores.backend.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
