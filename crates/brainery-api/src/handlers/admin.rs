//! Admin handlers. The admin service checks the caller's current role.

use axum::Json;
use axum::extract::{Path, Query, State};

use brainery_core::types::IdentityId;

use crate::dto::response::{AdminOverviewResponse, SuccessResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /admin
pub async fn overview(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<AdminOverviewResponse>, ApiError> {
    let overview = state
        .admin_service
        .overview(&auth, params.into_page_request())
        .await?;
    Ok(Json(AdminOverviewResponse::from(overview)))
}

/// POST /admin/promote/{id}
pub async fn promote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<IdentityId>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.admin_service.promote(&auth, &id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<IdentityId>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.admin_service.delete_identity(&auth, &id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
