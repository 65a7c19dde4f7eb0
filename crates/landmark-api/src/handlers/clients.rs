use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::IntoResponse;
use landmark_core::models::{Client, ListQuery};

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::content;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "clients",
    params(ListQuery),
    responses(
        (status = 200, description = "Clients, newest first", body = Vec<Client>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_clients"))]
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::list::<Client>(&state, &query).await?)
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client ID (UUID)")),
    responses(
        (status = 200, description = "Client found", body = Client),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Client not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(client_id = %id, operation = "get_client"))]
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::get::<Client>(&state, &id).await?)
}

/// Multipart form with `name, description, designation` and one image part (`clientImage` or `image`).
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "clients",
    request_body(content_type = "multipart/form-data", description = "Client fields and image"),
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Invalid fields, missing image or rejected file", body = ErrorResponse),
        (status = 500, description = "Image upload or persistence failed", body = ErrorResponse),
        (status = 504, description = "Image service timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "create_client"))]
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::create::<Client>(state, multipart).await?)
}

/// Partial update; fields left out keep their stored values and the image is optional.
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client ID (UUID)")),
    request_body(content_type = "multipart/form-data", description = "Changed fields and optional image"),
    responses(
        (status = 200, description = "Client updated", body = Client),
        (status = 400, description = "Invalid fields or rejected file", body = ErrorResponse),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 504, description = "Image service timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(client_id = %id, operation = "update_client"))]
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::update::<Client>(state, &id, multipart).await?)
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = String, Path, description = "Client ID (UUID)")),
    responses(
        (status = 200, description = "Client deleted"),
        (status = 404, description = "Client not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(client_id = %id, operation = "delete_client"))]
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(content::delete::<Client>(&state, &id).await?)
}
