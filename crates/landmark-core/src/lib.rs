//! Landmark Core Library
//!
//! Domain models, error types, configuration and field validation shared by
//! every Landmark component.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod submission;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, UploadSettings};
pub use error::{AppError, ErrorMetadata, FieldErrors, LogLevel};
pub use models::{
    resolve_image_url, ApiResponse, Client, ClientInput, Contact, ContactInput, ContentKind,
    ContentRecord, FormFields, PageRequest, Pagination, Project, ProjectInput,
    StoredImageReference, Subscription, SubscriptionInput, SubscriptionStats, UploadCandidate,
};
pub use storage_types::{DatabaseBackend, StorageBackend};
pub use submission::SubmissionStage;
