use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::IntoResponse;
use landmark_core::models::{ListQuery, Project};

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::content;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    params(ListQuery),
    responses(
        (status = 200, description = "Projects, newest first", body = Vec<Project>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_projects"))]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::list::<Project>(&state, &query).await?)
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project ID (UUID)")),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(project_id = %id, operation = "get_project"))]
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::get::<Project>(&state, &id).await?)
}

/// Multipart form with `name, description` and one image part (`projectImage` or `image`).
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body(content_type = "multipart/form-data", description = "Project fields and image"),
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Invalid fields, missing image or rejected file", body = ErrorResponse),
        (status = 500, description = "Image upload or persistence failed", body = ErrorResponse),
        (status = 504, description = "Image service timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "create_project"))]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::create::<Project>(state, multipart).await?)
}

/// Partial update; fields left out keep their stored values and the image is optional.
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project ID (UUID)")),
    request_body(content_type = "multipart/form-data", description = "Changed fields and optional image"),
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Invalid fields or rejected file", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 504, description = "Image service timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(project_id = %id, operation = "update_project"))]
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::update::<Project>(state, &id, multipart).await?)
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project ID (UUID)")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(project_id = %id, operation = "delete_project"))]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::delete::<Project>(&state, &id).await?)
}
