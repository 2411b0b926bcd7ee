//! Dashboard handlers: catalog browsing and saved topics.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use brainery_core::types::{SavedTopicId, SubjectId};

use crate::dto::request::{RenameTopicRequest, SaveTopicRequest};
use crate::dto::response::{
    CatalogTopicResponse, MessageResponse, SaveTopicResponse, SavedTopicResponse, SubjectResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /dashboard/subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<SubjectResponse>>, ApiError> {
    let subjects = state.catalog_service.list_subjects().await?;
    Ok(Json(subjects.into_iter().map(SubjectResponse::from).collect()))
}

/// GET /dashboard/topics/{subject_id}
pub async fn list_topics(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(subject_id): Path<SubjectId>,
) -> Result<Json<Vec<CatalogTopicResponse>>, ApiError> {
    let topics = state.catalog_service.list_topics(&subject_id).await?;
    Ok(Json(topics.into_iter().map(CatalogTopicResponse::from).collect()))
}

/// POST /dashboard/save_topic
pub async fn save_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SaveTopicRequest>,
) -> Result<(StatusCode, Json<SaveTopicResponse>), ApiError> {
    let saved = state
        .saved_topic_service
        .save(&auth, &req.title, req.summary.as_deref())
        .await?;
    let view = SavedTopicResponse::from(saved);
    Ok((
        StatusCode::CREATED,
        Json(SaveTopicResponse {
            message: "Topic saved successfully!".to_string(),
            timestamp: view.timestamp,
            id: view.id,
        }),
    ))
}

/// GET /dashboard/saved_topics
pub async fn list_saved_topics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SavedTopicResponse>>, ApiError> {
    let topics = state.saved_topic_service.list(&auth).await?;
    Ok(Json(topics.into_iter().map(SavedTopicResponse::from).collect()))
}

/// GET /dashboard/get_topic/{id}
pub async fn get_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SavedTopicId>,
) -> Result<Json<SavedTopicResponse>, ApiError> {
    let topic = state.saved_topic_service.get(&auth, &id).await?;
    Ok(Json(SavedTopicResponse::from(topic)))
}

/// PUT /dashboard/update_topic/{id}
pub async fn update_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SavedTopicId>,
    ValidatedJson(req): ValidatedJson<RenameTopicRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .saved_topic_service
        .rename(&auth, &id, &req.new_title)
        .await?;
    Ok(Json(MessageResponse::new("Topic updated successfully!")))
}

/// DELETE /dashboard/delete_topic/{id}
pub async fn delete_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SavedTopicId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.saved_topic_service.delete(&auth, &id).await?;
    Ok(Json(MessageResponse::new("Topic deleted successfully!")))
}
