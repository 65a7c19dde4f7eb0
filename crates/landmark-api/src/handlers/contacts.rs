//! Contact form submissions

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use landmark_core::models::{ApiResponse, Contact, ContactInput, ListQuery, UnreadCount};
use landmark_core::AppError;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::parse_id;
use crate::state::AppState;

const NOT_FOUND: &str = "Contact form not found";

#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = "contacts",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of contact forms, newest first", body = Vec<Contact>)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_contacts"))]
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = query.page_request();
    let listing = state.repos.contacts.list(Some(page)).await?;
    let pagination = listing.pagination(page);
    Ok(Json(ApiResponse::paginated_with_message(
        listing.items,
        pagination,
        "Contact forms retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/contacts/unread-count",
    tag = "contacts",
    responses((status = 200, description = "Number of unread contact forms", body = UnreadCount))
)]
#[tracing::instrument(skip(state), fields(operation = "unread_contact_count"))]
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let unread_count = state.repos.contacts.count_unread().await?;
    Ok(Json(ApiResponse::with_message(
        UnreadCount { unread_count },
        "Unread contact count retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    tag = "contacts",
    params(("id" = String, Path, description = "Contact ID (UUID)")),
    responses(
        (status = 200, description = "Contact form found", body = Contact),
        (status = 404, description = "Contact form not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(contact_id = %id, operation = "get_contact"))]
pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let contact = state
        .repos
        .contacts
        .get(parse_id(&id)?)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(ApiResponse::with_message(
        contact,
        "Contact form retrieved successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    tag = "contacts",
    request_body = ContactInput,
    responses(
        (status = 201, description = "Contact form stored", body = Contact),
        (status = 400, description = "Invalid fields", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, input), fields(operation = "create_contact"))]
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<ContactInput>,
) -> Result<impl IntoResponse, HttpAppError> {
    let input = input.normalized();
    input.validate()?;

    let contact = state.repos.contacts.insert(Contact::from_input(input)).await?;
    tracing::info!(contact_id = %contact.id, city = %contact.city, "Contact form submitted");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            contact,
            "Contact form submitted successfully",
        )),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/contacts/{id}/read",
    tag = "contacts",
    params(("id" = String, Path, description = "Contact ID (UUID)")),
    responses(
        (status = 200, description = "Contact marked as read", body = Contact),
        (status = 404, description = "Contact form not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(contact_id = %id, operation = "mark_contact_read"))]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let contact = state
        .repos
        .contacts
        .mark_read(parse_id(&id)?)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(ApiResponse::with_message(contact, "Contact marked as read")))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    tag = "contacts",
    params(("id" = String, Path, description = "Contact ID (UUID)")),
    responses(
        (status = 200, description = "Contact form deleted"),
        (status = 404, description = "Contact form not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(contact_id = %id, operation = "delete_contact"))]
pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.repos.contacts.delete(parse_id(&id)?).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()).into());
    }
    Ok(Json(ApiResponse::message("Contact form deleted successfully")))
}
