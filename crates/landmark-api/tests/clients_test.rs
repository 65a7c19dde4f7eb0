//! Client testimonial API integration tests.
//!
//! Run with: `cargo test -p landmark-api --test clients_test`

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{client_form, image_part, png};
use helpers::{api_path, setup_test_app};
use serde_json::Value;

#[tokio::test]
async fn create_and_fetch_client() {
    let app = setup_test_app().await;
    let form = client_form("Asha Rao", "Smooth purchase from start to finish", "CEO, Rao Foods")
        .add_part("clientImage", image_part(png(400, 600), "asha.jpg", "image/jpeg"));

    let response = app.client().post(&api_path("/clients")).multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["message"], "Client created successfully");
    assert_eq!(created["data"]["designation"], "CEO, Rao Foods");

    let id = created["data"]["id"].as_str().unwrap();
    let fetched: Value = app
        .client()
        .get(&api_path(&format!("/clients/{}", id)))
        .await
        .json();
    assert_eq!(fetched["message"], "Client retrieved successfully");
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
async fn designation_is_required() {
    let app = setup_test_app().await;
    let form = axum_test::multipart::MultipartForm::new()
        .add_text("name", "Asha Rao")
        .add_text("description", "Great")
        .add_part("clientImage", image_part(png(20, 20), "a.png", "image/png"));

    let response = app.client().post(&api_path("/clients")).multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"]["designation"][0], "Client designation is required");
    assert_eq!(app.images.calls(), 0);
    assert_eq!(app.client_count().await, 0);
}

#[tokio::test]
async fn project_field_name_is_not_a_client_image() {
    let app = setup_test_app().await;
    let form = client_form("Asha Rao", "Great", "CEO")
        .add_part("projectImage", image_part(png(20, 20), "a.png", "image/png"));

    let response = app.client().post(&api_path("/clients")).multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.images.calls(), 0);
}

#[tokio::test]
async fn missing_client_is_404() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .get(&api_path(&format!("/clients/{}", uuid::Uuid::new_v4())))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Client not found");
}
