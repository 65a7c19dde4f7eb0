//! Test helpers: build AppState and router for integration tests.
//!
//! The router runs against in-memory repositories and a fake image store, so
//! these tests need neither Postgres nor network access.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use std::sync::Arc;

use axum_test::TestServer;
use landmark_api::constants;
use landmark_api::setup::routes;
use landmark_api::state::AppState;
use landmark_core::Config;
use landmark_db::Repositories;
use landmark_storage::{ImageStore, LocalImageStore};
use tempfile::TempDir;

use storage::{RecordingStore, StoreBehavior};

/// API path prefix for tests.
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, state and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub images: Arc<RecordingStore>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub async fn project_count(&self) -> i64 {
        self.state.repos.projects.list(None).await.unwrap().total
    }

    pub async fn client_count(&self) -> i64 {
        self.state.repos.clients.list(None).await.unwrap().total
    }
}

fn build(config: Config, images: Arc<dyn ImageStore>) -> (TestServer, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, Repositories::in_memory(), images));
    let router = routes::setup_routes(state.clone()).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");
    (server, state)
}

/// App whose image store succeeds and records every candidate.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(StoreBehavior::Succeed).await
}

pub async fn setup_test_app_with(behavior: StoreBehavior) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = Config::for_memory(temp_dir.path().to_string_lossy().to_string());
    let images = Arc::new(RecordingStore::new(behavior));
    let (server, state) = build(config, images.clone());
    TestApp {
        server,
        state,
        images,
        _temp_dir: temp_dir,
    }
}

/// App backed by the local filesystem store (legacy `/uploads` mode).
pub async fn setup_local_app() -> (TestServer, Arc<AppState>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = Config::for_memory(temp_dir.path().to_string_lossy().to_string());
    let store = LocalImageStore::new(temp_dir.path(), &config.upload_settings())
        .await
        .expect("Failed to create local store");
    let (server, state) = build(config, Arc::new(store));
    (server, state, temp_dir)
}
