//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use landmark_core::Config;
use landmark_storage::create_image_store;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_tracing();

    config.validate().context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let repos = database::setup_repositories(&config).await?;

    let images = create_image_store(&config)
        .await
        .context("Failed to initialize image store")?;
    tracing::info!(backend = %images.backend_type(), "Image store ready");

    let state = Arc::new(AppState::new(config, repos, images));
    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
