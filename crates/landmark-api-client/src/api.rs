//! Domain methods for the Landmark API client.
//!
//! Response bodies reuse the `landmark_core` models inside the
//! `{success, data, pagination, message}` envelope.

use landmark_core::models::UnreadCount;
use landmark_core::{
    ApiResponse, Client, Contact, ContactInput, ContentKind, Project, Subscription,
    SubscriptionInput, SubscriptionStats,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::{ApiClient, ClientResult, API_PREFIX};

/// Envelope without a `data` payload (deletes, unsubscribe).
pub type MessageResponse = ApiResponse<Value>;

fn page_query(page: Option<i64>, limit: Option<i64>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(p) = page {
        query.push(("page", p.to_string()));
    }
    if let Some(l) = limit {
        query.push(("limit", l.to_string()));
    }
    query
}

pub(crate) fn content_path(kind: ContentKind) -> String {
    format!("{}/{}", API_PREFIX, kind.collection())
}

impl ApiClient {
    async fn list_content<T: DeserializeOwned>(
        &self,
        kind: ContentKind,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> ClientResult<ApiResponse<Vec<T>>> {
        self.get(&content_path(kind), &page_query(page, limit)).await
    }

    /// List projects, newest first. Pagination is returned only when `page` or `limit` is set.
    pub async fn list_projects(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> ClientResult<ApiResponse<Vec<Project>>> {
        self.list_content(ContentKind::Project, page, limit).await
    }

    pub async fn get_project(&self, id: Uuid) -> ClientResult<ApiResponse<Project>> {
        self.get(&format!("{}/{}", content_path(ContentKind::Project), id), &[])
            .await
    }

    pub async fn delete_project(&self, id: Uuid) -> ClientResult<MessageResponse> {
        self.delete(&format!("{}/{}", content_path(ContentKind::Project), id))
            .await
    }

    /// List client testimonials, newest first.
    pub async fn list_clients(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> ClientResult<ApiResponse<Vec<Client>>> {
        self.list_content(ContentKind::Client, page, limit).await
    }

    pub async fn get_client(&self, id: Uuid) -> ClientResult<ApiResponse<Client>> {
        self.get(&format!("{}/{}", content_path(ContentKind::Client), id), &[])
            .await
    }

    pub async fn delete_client(&self, id: Uuid) -> ClientResult<MessageResponse> {
        self.delete(&format!("{}/{}", content_path(ContentKind::Client), id))
            .await
    }

    /// List contact-form submissions. Always paginated server side.
    pub async fn list_contacts(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> ClientResult<ApiResponse<Vec<Contact>>> {
        self.get(
            &format!("{}/contacts", API_PREFIX),
            &page_query(page, limit),
        )
        .await
    }

    pub async fn unread_contacts(&self) -> ClientResult<i64> {
        let response: ApiResponse<UnreadCount> = self
            .get(&format!("{}/contacts/unread-count", API_PREFIX), &[])
            .await?;
        Ok(response.data.map(|d| d.unread_count).unwrap_or_default())
    }

    pub async fn get_contact(&self, id: Uuid) -> ClientResult<ApiResponse<Contact>> {
        self.get(&format!("{}/contacts/{}", API_PREFIX, id), &[])
            .await
    }

    pub async fn submit_contact(&self, input: &ContactInput) -> ClientResult<ApiResponse<Contact>> {
        self.post_json(&format!("{}/contacts", API_PREFIX), input)
            .await
    }

    pub async fn mark_contact_read(&self, id: Uuid) -> ClientResult<ApiResponse<Contact>> {
        self.patch(&format!("{}/contacts/{}/read", API_PREFIX, id))
            .await
    }

    pub async fn delete_contact(&self, id: Uuid) -> ClientResult<MessageResponse> {
        self.delete(&format!("{}/contacts/{}", API_PREFIX, id))
            .await
    }

    /// List active newsletter subscriptions.
    pub async fn list_subscriptions(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> ClientResult<ApiResponse<Vec<Subscription>>> {
        self.get(
            &format!("{}/subscriptions", API_PREFIX),
            &page_query(page, limit),
        )
        .await
    }

    pub async fn subscription_stats(&self) -> ClientResult<ApiResponse<SubscriptionStats>> {
        self.get(&format!("{}/subscriptions/stats", API_PREFIX), &[])
            .await
    }

    /// Subscribe an email, reactivating a previous subscription when there is one.
    pub async fn subscribe(&self, email: &str) -> ClientResult<ApiResponse<Subscription>> {
        let input = SubscriptionInput {
            email: Some(email.to_string()),
        };
        self.post_json(&format!("{}/subscriptions", API_PREFIX), &input)
            .await
    }

    pub async fn unsubscribe(&self, email: &str) -> ClientResult<ApiResponse<Subscription>> {
        let input = SubscriptionInput {
            email: Some(email.to_string()),
        };
        self.post_json(&format!("{}/subscriptions/unsubscribe", API_PREFIX), &input)
            .await
    }

    pub async fn delete_subscription(&self, id: Uuid) -> ClientResult<MessageResponse> {
        self.delete(&format!("{}/subscriptions/{}", API_PREFIX, id))
            .await
    }

    /// Liveness probe, returned as raw JSON.
    pub async fn health(&self) -> ClientResult<Value> {
        self.get("/health", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const PROJECT: &str = r#"{
        "id": "8f14e45f-ceea-467a-9af0-6f1f1e3f2a10",
        "name": "Lakeview Tower",
        "description": "Thirty floors over the water",
        "image": "https://res.cloudinary.com/demo/image/upload/v1/landmark-real-estate/abc.jpg",
        "imagePublicId": "landmark-real-estate/abc",
        "createdAt": "2026-01-05T10:00:00Z",
        "updatedAt": "2026-01-05T10:00:00Z"
    }"#;

    #[tokio::test]
    async fn list_projects_sends_page_and_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"success":true,"data":[{}],"pagination":{{"page":2,"limit":5,"total":6,"pages":2}}}}"#,
                PROJECT
            ))
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let response = client.list_projects(Some(2), Some(5)).await.unwrap();
        let projects = response.data.unwrap();
        assert_eq!(projects[0].name, "Lakeview Tower");
        assert_eq!(response.pagination.unwrap().pages, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_record_surfaces_not_found() {
        let mut server = Server::new_async().await;
        let id = Uuid::new_v4();
        let _mock = server
            .mock("DELETE", format!("/api/clients/{}", id).as_str())
            .with_status(404)
            .with_body(r#"{"success":false,"message":"Client not found","error":"NotFound","code":"NOT_FOUND","recoverable":false}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client.delete_client(id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.code(), Some("NOT_FOUND"));
    }

    #[tokio::test]
    async fn unread_count_unwraps_envelope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/contacts/unread-count")
            .with_status(200)
            .with_body(r#"{"success":true,"data":{"unreadCount":3}}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        assert_eq!(client.unread_contacts().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn unsubscribe_posts_email() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/subscriptions/unsubscribe")
            .match_body(Matcher::Json(serde_json::json!({"email": "ana@example.com"})))
            .with_status(404)
            .with_body(r#"{"success":false,"message":"Active subscription not found","error":"NotFound","code":"NOT_FOUND","recoverable":false}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client.unsubscribe("ana@example.com").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API request failed with status 404: Active subscription not found"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn garbage_success_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let client = ApiClient::new(server.url()).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, crate::ClientError::Decode(_)));
    }
}
