//! Newsletter subscriptions

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use landmark_core::models::{
    ApiResponse, ListQuery, Subscription, SubscriptionInput, SubscriptionStats,
};
use landmark_core::AppError;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::parse_id;
use crate::state::AppState;

const NOT_FOUND: &str = "Subscription not found";
const RECENT_WINDOW_DAYS: i64 = 30;

/// Validated, lower-cased email from a `{email}` body.
fn normalized_email(input: SubscriptionInput) -> Result<String, AppError> {
    let input = input.normalized();
    input.validate()?;
    input
        .email
        .ok_or_else(|| AppError::invalid_field("email", "Email is required"))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions",
    tag = "subscriptions",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of active subscriptions", body = Vec<Subscription>)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_subscriptions"))]
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = query.page_request();
    let listing = state.repos.subscriptions.list_active(page).await?;
    let pagination = listing.pagination(page);
    Ok(Json(ApiResponse::paginated_with_message(
        listing.items,
        pagination,
        "Subscriptions retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/stats",
    tag = "subscriptions",
    responses((status = 200, description = "Subscription counters", body = SubscriptionStats))
)]
#[tracing::instrument(skip(state), fields(operation = "subscription_stats"))]
pub async fn subscription_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
    let stats = state.repos.subscriptions.stats(since).await?;
    Ok(Json(ApiResponse::with_message(
        stats,
        "Subscription statistics retrieved successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription ID (UUID)")),
    responses(
        (status = 200, description = "Subscription found", body = Subscription),
        (status = 404, description = "Subscription not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(subscription_id = %id, operation = "get_subscription"))]
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let subscription = state
        .repos
        .subscriptions
        .get(parse_id(&id)?)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(ApiResponse::with_message(
        subscription,
        "Subscription retrieved successfully",
    )))
}

/// New emails get 201. A previously unsubscribed email is reactivated under its original id.
#[utoipa::path(
    post,
    path = "/api/subscriptions",
    tag = "subscriptions",
    request_body = SubscriptionInput,
    responses(
        (status = 201, description = "Subscription created", body = Subscription),
        (status = 200, description = "Subscription reactivated", body = Subscription),
        (status = 400, description = "Invalid or already subscribed email", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, input), fields(operation = "subscribe"))]
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<SubscriptionInput>,
) -> Result<impl IntoResponse, HttpAppError> {
    let email = normalized_email(input)?;
    let repo = &state.repos.subscriptions;

    match repo.find_by_email(&email).await? {
        Some(existing) if existing.is_active => {
            Err(AppError::BadRequest("Email is already subscribed".to_string()).into())
        }
        Some(mut existing) => {
            existing.reactivate(Utc::now());
            let reactivated = repo
                .replace(existing)
                .await?
                .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
            tracing::info!(subscription_id = %reactivated.id, "Subscription reactivated");
            Ok((
                StatusCode::OK,
                Json(ApiResponse::with_message(
                    reactivated,
                    "Subscription reactivated successfully",
                )),
            ))
        }
        None => {
            let created = repo.insert(Subscription::new(email)).await?;
            tracing::info!(subscription_id = %created.id, "Subscription created");
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::with_message(
                    created,
                    "Subscription created successfully",
                )),
            ))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/subscriptions/unsubscribe",
    tag = "subscriptions",
    request_body = SubscriptionInput,
    responses(
        (status = 200, description = "Unsubscribed", body = Subscription),
        (status = 404, description = "Active subscription not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, input), fields(operation = "unsubscribe"))]
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<SubscriptionInput>,
) -> Result<impl IntoResponse, HttpAppError> {
    let email = normalized_email(input)?;
    let repo = &state.repos.subscriptions;

    let mut subscription = repo
        .find_by_email(&email)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| AppError::NotFound("Active subscription not found".to_string()))?;

    subscription.unsubscribe(Utc::now());
    let updated = repo
        .replace(subscription)
        .await?
        .ok_or_else(|| AppError::NotFound("Active subscription not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(updated, "Unsubscribed successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription ID (UUID)")),
    responses(
        (status = 200, description = "Subscription deleted"),
        (status = 404, description = "Subscription not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(subscription_id = %id, operation = "delete_subscription"))]
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.repos.subscriptions.delete(parse_id(&id)?).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()).into());
    }
    Ok(Json(ApiResponse::message("Subscription deleted successfully")))
}
