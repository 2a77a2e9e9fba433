//! Project CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

use crate::project::{ProjectDocument, ProjectSummary};

use super::super::state::AppState;
use super::{ApiError, blocking};

/// Response from the create endpoint.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Response from the update endpoint. `id` replaces the caller's id.
#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub id: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /api/projects - List stored projects.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let store = state.store.clone();
    blocking(move || store.list()).await.map(Json)
}

/// POST /api/projects - Store a new project.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(doc): Json<ProjectDocument>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let store = state.store.clone();
    let id = blocking(move || store.create(&doc)).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /api/projects/:id - Load a project.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProjectDocument>, ApiError> {
    let store = state.store.clone();
    blocking(move || store.get(&id)).await.map(Json)
}

/// PUT /api/projects/:id - Overwrite a project.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(doc): Json<ProjectDocument>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let store = state.store.clone();
    let id = blocking(move || store.update(&id, &doc)).await?;
    Ok(Json(UpdatedResponse {
        id,
        message: "Updated",
    }))
}

/// DELETE /api/projects/:id - Remove a project (no error if already gone).
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = state.store.clone();
    blocking(move || store.delete(&id)).await?;
    Ok(Json(MessageResponse { message: "Deleted" }))
}
