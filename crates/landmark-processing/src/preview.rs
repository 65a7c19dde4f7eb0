//! Scoped preview URLs.
//!
//! A [`PreviewRegistry`] hands out `blob:`-style URLs that resolve to the
//! source bytes while a preview is on screen. Each URL is owned by a
//! [`PreviewUrl`] guard and revoked when the guard is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `data` and return a guard owning its URL.
    pub fn create(&self, data: Bytes) -> PreviewUrl {
        let url = format!("blob:landmark/{}", Uuid::new_v4());
        self.lock().insert(url.clone(), data);
        tracing::trace!(url = %url, "Preview URL created");
        PreviewUrl {
            url,
            registry: self.clone(),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        self.lock().get(url).cloned()
    }

    /// Number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn revoke(&self, url: &str) {
        if self.lock().remove(url).is_some() {
            tracing::trace!(url = %url, "Preview URL revoked");
        }
    }

    // A poisoned map still holds valid entries.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Bytes>> {
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Revokes its URL on drop.
#[derive(Debug)]
pub struct PreviewUrl {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewUrl {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}
