//! Route configuration and setup

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Json, Router,
};
use landmark_core::Config;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, UPLOADS_ROUTE};
use crate::handlers::{clients, contacts, health, projects, subscriptions};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let config = &state.config;
    let cors = setup_cors(config)?;

    // Twice the ingress cap so oversize files reach the ingress validator and get its message.
    let body_limit = config.max_file_size_bytes().saturating_mul(2);

    let api = Router::new()
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route("/contacts/unread-count", get(contacts::unread_count))
        .route(
            "/contacts/{id}",
            get(contacts::get_contact).delete(contacts::delete_contact),
        )
        .route("/contacts/{id}/read", patch(contacts::mark_read))
        .route(
            "/subscriptions",
            get(subscriptions::list_subscriptions).post(subscriptions::subscribe),
        )
        .route("/subscriptions/stats", get(subscriptions::subscription_stats))
        .route("/subscriptions/unsubscribe", post(subscriptions::unsubscribe))
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get_subscription).delete(subscriptions::delete_subscription),
        )
        .route("/", get(health::api_directory))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    let app = Router::new()
        .route("/", get(health::service_info))
        .route("/health", get(health::health_check))
        .nest(API_PREFIX, api)
        .nest_service(UPLOADS_ROUTE, ServeDir::new(config.local_storage_path()))
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .fallback(health::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs(),
        )))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        // Credentials cannot be combined with a wildcard origin; mirror the request origin instead.
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_origin() {
        let mut config = Config::for_memory("uploads");
        config.base.cors_origins = vec!["http://ok.example".into(), "bad\norigin".into()];
        assert!(setup_cors(&config).is_err());
    }

    #[test]
    fn accepts_wildcard_and_explicit_origins() {
        let mut config = Config::for_memory("uploads");
        assert!(setup_cors(&config).is_ok());
        config.base.cors_origins = vec!["*".into()];
        assert!(setup_cors(&config).is_ok());
    }
}
