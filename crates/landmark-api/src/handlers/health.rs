//! Liveness, service info and the endpoint directory.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::constants::SERVICE_NAME;
use crate::state::AppState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub image_store: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and document store are healthy", body = HealthResponse),
        (status = 503, description = "Document store unavailable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match tokio::time::timeout(PROBE_TIMEOUT, state.repos.projects.ping()).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Document store health check failed");
            format!("unhealthy: {}", e)
        }
        Err(_) => {
            tracing::error!("Document store health check timed out");
            "timeout".to_string()
        }
    };

    let healthy = database == "healthy";
    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        database,
        image_store: state.images.backend_type().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

pub async fn service_info() -> impl IntoResponse {
    Json(json!({
        "message": format!("{} is running", SERVICE_NAME),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "projects": "/api/projects",
            "clients": "/api/clients",
            "contacts": "/api/contacts",
            "subscriptions": "/api/subscriptions",
            "health": "/health",
            "docs": "/docs"
        }
    }))
}

pub async fn api_directory() -> impl IntoResponse {
    Json(json!({
        "message": format!("{} documentation", SERVICE_NAME),
        "version": env!("CARGO_PKG_VERSION"),
        "openapi": "/api/openapi.json",
        "endpoints": {
            "projects": {
                "GET": "/api/projects - List projects",
                "POST": "/api/projects - Create project (multipart, image required)",
                "GET_ID": "/api/projects/{id} - Get single project",
                "PUT": "/api/projects/{id} - Update project (image optional)",
                "DELETE": "/api/projects/{id} - Delete project"
            },
            "clients": {
                "GET": "/api/clients - List clients",
                "POST": "/api/clients - Create client (multipart, image required)",
                "GET_ID": "/api/clients/{id} - Get single client",
                "PUT": "/api/clients/{id} - Update client (image optional)",
                "DELETE": "/api/clients/{id} - Delete client"
            },
            "contacts": {
                "GET": "/api/contacts - List contact forms",
                "POST": "/api/contacts - Submit contact form",
                "GET_UNREAD": "/api/contacts/unread-count - Unread count",
                "GET_ID": "/api/contacts/{id} - Get single contact",
                "PATCH": "/api/contacts/{id}/read - Mark as read",
                "DELETE": "/api/contacts/{id} - Delete contact"
            },
            "subscriptions": {
                "GET": "/api/subscriptions - List active subscriptions",
                "POST": "/api/subscriptions - Subscribe email",
                "POST_UNSUB": "/api/subscriptions/unsubscribe - Unsubscribe",
                "GET_STATS": "/api/subscriptions/stats - Statistics",
                "GET_ID": "/api/subscriptions/{id} - Get single subscription",
                "DELETE": "/api/subscriptions/{id} - Delete subscription"
            }
        }
    }))
}

/// Fallback for unmatched routes.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": format!("Route {} not found", uri.path()),
        })),
    )
}
