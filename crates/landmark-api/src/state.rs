//! Application state shared by every handler.

use std::sync::Arc;

use landmark_core::Config;
use landmark_db::Repositories;
use landmark_processing::IngressValidator;
use landmark_storage::ImageStore;

pub struct AppState {
    pub config: Config,
    pub repos: Repositories,
    /// Remote transform-and-store (or the local `/uploads` fallback).
    pub images: Arc<dyn ImageStore>,
    pub ingress: IngressValidator,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories, images: Arc<dyn ImageStore>) -> Self {
        let ingress = IngressValidator::from_settings(&config.upload_settings());
        Self {
            config,
            repos,
            images,
            ingress,
        }
    }

    /// Base URL legacy relative image paths are resolved against.
    pub fn public_base_url(&self) -> &str {
        self.config.public_base_url()
    }
}
