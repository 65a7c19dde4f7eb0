//! Handlers shared by the image-backed collections (projects, clients).

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::Json;
use landmark_core::models::{ApiResponse, ListQuery};
use landmark_core::AppError;

use crate::handlers::parse_id;
use crate::services::{create_record, update_record, ContentResource};
use crate::state::AppState;
use crate::utils::multipart::{read_submission, require_multipart};

/// Newest first. Paged only when `page` or `limit` is present.
pub async fn list<T: ContentResource>(
    state: &AppState,
    query: &ListQuery,
) -> Result<Json<ApiResponse<Vec<T>>>, AppError> {
    let repo = T::repository(&state.repos);
    let base_url = state.public_base_url();
    let message = format!("{}s retrieved successfully", T::KIND.label());

    if query.is_paginated() {
        let page = query.page_request();
        let listing = repo.list(Some(page)).await?;
        let pagination = listing.pagination(page);
        let items = listing
            .items
            .into_iter()
            .map(|r| r.with_resolved_image(base_url))
            .collect();
        Ok(Json(ApiResponse::paginated_with_message(
            items, pagination, message,
        )))
    } else {
        let listing = repo.list(None).await?;
        let items = listing
            .items
            .into_iter()
            .map(|r| r.with_resolved_image(base_url))
            .collect();
        Ok(Json(ApiResponse::with_message(items, message)))
    }
}

pub async fn get<T: ContentResource>(
    state: &AppState,
    raw_id: &str,
) -> Result<Json<ApiResponse<T>>, AppError> {
    let id = parse_id(raw_id)?;
    let record = T::repository(&state.repos)
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(T::KIND.not_found()))?;
    Ok(Json(ApiResponse::with_message(
        record.with_resolved_image(state.public_base_url()),
        format!("{} retrieved successfully", T::KIND.label()),
    )))
}

pub async fn create<T: ContentResource>(
    state: Arc<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<T>>), AppError> {
    let multipart = require_multipart(multipart)?;
    let submission = read_submission(multipart, T::KIND, &state.ingress).await?;
    let record = create_record::<T>(&state, submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            record,
            format!("{} created successfully", T::KIND.label()),
        )),
    ))
}

pub async fn update<T: ContentResource>(
    state: Arc<AppState>,
    raw_id: &str,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    let id = parse_id(raw_id)?;
    let multipart = require_multipart(multipart)?;
    let submission = read_submission(multipart, T::KIND, &state.ingress).await?;
    let record = update_record::<T>(&state, id, submission).await?;
    Ok(Json(ApiResponse::with_message(
        record,
        format!("{} updated successfully", T::KIND.label()),
    )))
}

pub async fn delete<T: ContentResource>(
    state: &AppState,
    raw_id: &str,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(raw_id)?;
    if !T::repository(&state.repos).delete(id).await? {
        return Err(AppError::NotFound(T::KIND.not_found()));
    }
    tracing::info!(kind = T::KIND.label(), id = %id, "Record deleted");
    Ok(Json(ApiResponse::message(format!(
        "{} deleted successfully",
        T::KIND.label()
    ))))
}
