//! Domain models
//!
//! Content records (projects and client testimonials), contact-form entries,
//! newsletter subscriptions, and the image and envelope types the upload
//! pipeline passes between stages.

pub mod client;
pub mod contact;
pub mod content;
pub mod envelope;
pub mod image;
pub mod project;
pub mod subscription;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use client::{Client, ClientInput};
pub use contact::{Contact, ContactInput, UnreadCount};
pub use content::{ContentKind, ContentRecord, FormFields};
pub use envelope::{ApiResponse, ListQuery, PageRequest, Pagination};
pub use image::{resolve_image_url, StoredImageReference, UploadCandidate};
pub use project::{Project, ProjectInput};
pub use subscription::{Subscription, SubscriptionInput, SubscriptionStats};

/// A stored document: addressed by id, ordered by creation time.
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    /// Stamp `updated_at` before a write.
    fn touch(&mut self, now: DateTime<Utc>);
}
