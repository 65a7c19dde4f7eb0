use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landmark_core::models::{
    Contact, Document, PageRequest, Pagination, Subscription, SubscriptionStats,
};
use landmark_core::AppError;
use uuid::Uuid;

/// One page (or all) of a collection plus the unpaged total.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Listing<T> {
    pub fn pagination(&self, page: PageRequest) -> Pagination {
        Pagination::new(page, self.total)
    }
}

/// Basic document operations shared by every collection.
#[async_trait]
pub trait Repository<T: Document>: Send + Sync {
    /// Newest first. `None` returns everything.
    async fn list(&self, page: Option<PageRequest>) -> Result<Listing<T>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<T>, AppError>;

    async fn insert(&self, record: T) -> Result<T, AppError>;

    /// Overwrite an existing document. `None` when the id is unknown.
    async fn replace(&self, record: T) -> Result<Option<T>, AppError>;

    /// `true` when a document was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
pub trait ContactRepository: Repository<Contact> {
    async fn mark_read(&self, id: Uuid) -> Result<Option<Contact>, AppError>;

    async fn count_unread(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait SubscriptionRepository: Repository<Subscription> {
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscription>, AppError>;

    async fn list_active(&self, page: PageRequest) -> Result<Listing<Subscription>, AppError>;

    /// Active count, inactive count, and active records created at or after `since`.
    async fn stats(&self, since: DateTime<Utc>) -> Result<SubscriptionStats, AppError>;
}

pub(crate) const DUPLICATE_EMAIL: &str = "Email is already subscribed";
