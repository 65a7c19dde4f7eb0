//! OpenAPI documentation served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use landmark_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Landmark Real Estate API",
        version = "0.1.0",
        description = "Back office for projects, client testimonials, contact forms and newsletter subscriptions. Project and client images are fill-cropped to 450x350 by the image store."
    ),
    paths(
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::contacts::list_contacts,
        handlers::contacts::unread_count,
        handlers::contacts::get_contact,
        handlers::contacts::create_contact,
        handlers::contacts::mark_read,
        handlers::contacts::delete_contact,
        handlers::subscriptions::list_subscriptions,
        handlers::subscriptions::subscription_stats,
        handlers::subscriptions::get_subscription,
        handlers::subscriptions::subscribe,
        handlers::subscriptions::unsubscribe,
        handlers::subscriptions::delete_subscription,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::Project,
            models::Client,
            models::Contact,
            models::ContactInput,
            models::UnreadCount,
            models::Subscription,
            models::SubscriptionInput,
            models::SubscriptionStats,
            models::Pagination,
            models::StoredImageReference,
            error::ErrorResponse,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "projects", description = "Portfolio projects with a cropped cover image"),
        (name = "clients", description = "Client testimonials with a cropped portrait"),
        (name = "contacts", description = "Contact form submissions"),
        (name = "subscriptions", description = "Newsletter subscriptions"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_collection() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/projects",
            "/api/projects/{id}",
            "/api/clients/{id}",
            "/api/contacts/{id}/read",
            "/api/subscriptions/unsubscribe",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
