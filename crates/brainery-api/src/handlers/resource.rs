//! Resource handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use brainery_core::types::ResourceId;
use brainery_service::{ResourceDraft, ResourceUpdate};

use crate::dto::request::{CreateResourceRequest, UpdateResourceRequest};
use crate::dto::response::{MessageResponse, ResourceResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /resources
pub async fn list_resources(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    let resources = state.resource_service.list(&auth).await?;
    Ok(Json(resources.into_iter().map(ResourceResponse::from).collect()))
}

/// POST /resources
pub async fn create_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateResourceRequest>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError> {
    let draft = ResourceDraft {
        title: req.title,
        description: req.description,
        link: req.link,
        category: req.category,
    };
    let resource = state.resource_service.create(&auth, draft).await?;
    Ok((StatusCode::CREATED, Json(ResourceResponse::from(resource))))
}

/// GET /resources/{id}
pub async fn get_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ResourceId>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let resource = state.resource_service.get(&auth, &id).await?;
    Ok(Json(ResourceResponse::from(resource)))
}

/// PUT /resources/{id}
pub async fn update_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ResourceId>,
    ValidatedJson(req): ValidatedJson<UpdateResourceRequest>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let update = ResourceUpdate {
        title: req.title,
        description: req.description,
        link: req.link,
        category: req.category,
    };
    let resource = state.resource_service.update(&auth, &id, update).await?;
    Ok(Json(ResourceResponse::from(resource)))
}

/// DELETE /resources/{id}
pub async fn delete_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ResourceId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.resource_service.delete(&auth, &id).await?;
    Ok(Json(MessageResponse::new("Resource deleted successfully!")))
}
