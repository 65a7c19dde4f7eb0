//! Newsletter subscription API integration tests.

mod helpers;

use axum::http::StatusCode;
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn subscribe_duplicate_and_reactivate() {
    let app = setup_test_app().await;
    let email = json!({ "email": "News@Example.com" });

    let created = app.client().post(&api_path("/subscriptions")).json(&email).await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let created: Value = created.json();
    assert_eq!(created["data"]["email"], "news@example.com");
    let id = created["data"]["id"].clone();

    let duplicate = app.client().post(&api_path("/subscriptions")).json(&email).await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = duplicate.json();
    assert_eq!(body["message"], "Email is already subscribed");

    let unsubscribed = app
        .client()
        .post(&api_path("/subscriptions/unsubscribe"))
        .json(&json!({ "email": "news@example.com" }))
        .await;
    assert_eq!(unsubscribed.status_code(), StatusCode::OK);
    let body: Value = unsubscribed.json();
    assert_eq!(body["data"]["isActive"], false);

    let reactivated = app.client().post(&api_path("/subscriptions")).json(&email).await;
    assert_eq!(reactivated.status_code(), StatusCode::OK);
    let body: Value = reactivated.json();
    assert_eq!(body["message"], "Subscription reactivated successfully");
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["isActive"], true);
    assert!(body["data"]["unsubscribedAt"].is_null());
}

#[tokio::test]
async fn unsubscribe_unknown_email_is_404() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/subscriptions/unsubscribe"))
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Active subscription not found");
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/subscriptions"))
        .json(&json!({ "email": "not-an-email" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"]["email"][0], "Please enter a valid email");
}

#[tokio::test]
async fn stats_and_active_listing() {
    let app = setup_test_app().await;
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        app.client()
            .post(&api_path("/subscriptions"))
            .json(&json!({ "email": email }))
            .await
            .assert_status(StatusCode::CREATED);
    }
    app.client()
        .post(&api_path("/subscriptions/unsubscribe"))
        .json(&json!({ "email": "b@example.com" }))
        .await
        .assert_status_ok();

    let stats: Value = app
        .client()
        .get(&api_path("/subscriptions/stats"))
        .await
        .json();
    assert_eq!(stats["data"]["totalSubscriptions"], 2);
    assert_eq!(stats["data"]["totalUnsubscribed"], 1);
    assert_eq!(stats["data"]["recentSubscriptions"], 2);

    let listing: Value = app.client().get(&api_path("/subscriptions")).await.json();
    let emails: Vec<&str> = listing["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails.len(), 2);
    assert!(!emails.contains(&"b@example.com"));
    assert_eq!(listing["pagination"]["total"], 2);
    assert_eq!(listing["message"], "Subscriptions retrieved successfully");

    let id = listing["data"][0]["id"].as_str().unwrap();
    let fetched: Value = app
        .client()
        .get(&api_path(&format!("/subscriptions/{}", id)))
        .await
        .json();
    assert_eq!(fetched["message"], "Subscription retrieved successfully");
    assert_eq!(fetched["data"]["id"], id);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let app = setup_test_app().await;
    app.client()
        .post(&api_path("/subscriptions"))
        .json(&json!({ "email": "a@example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .client()
        .get(&api_path("/subscriptions"))
        .add_query_param("page", i64::MAX)
        .add_query_param("limit", 100)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 1);
}
