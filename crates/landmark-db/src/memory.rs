//! In-memory collections.
//!
//! Each collection is a map behind a `tokio::sync::RwLock`; writes are
//! serialized per collection, giving last-write-wins semantics for
//! concurrent updates of the same document.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landmark_core::models::{
    Contact, Document, PageRequest, Subscription, SubscriptionStats,
};
use landmark_core::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::{
    ContactRepository, Listing, Repository, SubscriptionRepository, DUPLICATE_EMAIL,
};

/// Uniqueness constraint enforced on insert and replace.
#[derive(Clone)]
struct UniqueKey<T> {
    key: fn(&T) -> String,
    message: &'static str,
}

#[derive(Clone)]
pub struct MemoryCollection<T> {
    docs: Arc<RwLock<HashMap<Uuid, T>>>,
    unique: Option<UniqueKey<T>>,
}

impl<T: Document> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
            unique: None,
        }
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    fn check_unique(&self, docs: &HashMap<Uuid, T>, record: &T) -> Result<(), AppError> {
        if let Some(unique) = &self.unique {
            let key = (unique.key)(record);
            let clash = docs
                .values()
                .any(|other| other.id() != record.id() && (unique.key)(other) == key);
            if clash {
                return Err(AppError::BadRequest(unique.message.to_string()));
            }
        }
        Ok(())
    }

    /// Newest first; ties broken by id so paging is stable.
    async fn sorted(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        let docs = self.docs.read().await;
        let mut items: Vec<T> = docs.values().filter(|d| filter(d)).cloned().collect();
        items.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        items
    }
}

impl<T: Document> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCollection<Subscription> {
    /// Subscription collection with a unique email constraint.
    pub fn subscriptions() -> Self {
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
            unique: Some(UniqueKey {
                key: |s: &Subscription| s.email.clone(),
                message: DUPLICATE_EMAIL,
            }),
        }
    }
}

fn paginate<T>(items: Vec<T>, page: Option<PageRequest>) -> Listing<T> {
    let total = items.len() as i64;
    let items = match page {
        Some(page) => items
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .collect(),
        None => items,
    };
    Listing { items, total }
}

#[async_trait]
impl<T: Document> Repository<T> for MemoryCollection<T> {
    async fn list(&self, page: Option<PageRequest>) -> Result<Listing<T>, AppError> {
        Ok(paginate(self.sorted(|_| true).await, page))
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, AppError> {
        Ok(self.docs.read().await.get(&id).cloned())
    }

    async fn insert(&self, record: T) -> Result<T, AppError> {
        let mut docs = self.docs.write().await;
        if docs.contains_key(&record.id()) {
            return Err(AppError::Persistence(format!(
                "duplicate document id {}",
                record.id()
            )));
        }
        self.check_unique(&docs, &record)?;
        docs.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn replace(&self, mut record: T) -> Result<Option<T>, AppError> {
        let mut docs = self.docs.write().await;
        if !docs.contains_key(&record.id()) {
            return Ok(None);
        }
        self.check_unique(&docs, &record)?;
        record.touch(Utc::now());
        docs.insert(record.id(), record.clone());
        Ok(Some(record))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.docs.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ContactRepository for MemoryCollection<Contact> {
    async fn mark_read(&self, id: Uuid) -> Result<Option<Contact>, AppError> {
        let mut docs = self.docs.write().await;
        Ok(docs.get_mut(&id).map(|contact| {
            contact.is_read = true;
            contact.touch(Utc::now());
            contact.clone()
        }))
    }

    async fn count_unread(&self) -> Result<i64, AppError> {
        let docs = self.docs.read().await;
        Ok(docs.values().filter(|c| !c.is_read).count() as i64)
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryCollection<Subscription> {
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscription>, AppError> {
        let docs = self.docs.read().await;
        Ok(docs.values().find(|s| s.email == email).cloned())
    }

    async fn list_active(&self, page: PageRequest) -> Result<Listing<Subscription>, AppError> {
        Ok(paginate(self.sorted(|s| s.is_active).await, Some(page)))
    }

    async fn stats(&self, since: DateTime<Utc>) -> Result<SubscriptionStats, AppError> {
        let docs = self.docs.read().await;
        let active = docs.values().filter(|s| s.is_active).count() as i64;
        let recent = docs
            .values()
            .filter(|s| s.is_active && s.created_at >= since)
            .count() as i64;
        Ok(SubscriptionStats {
            total_subscriptions: active,
            total_unsubscribed: docs.len() as i64 - active,
            recent_subscriptions: recent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use landmark_core::models::{ContentRecord, FormFields, Project, StoredImageReference};

    fn project(name: &str) -> Project {
        let fields: FormFields = [("name", name), ("description", "desc")]
            .into_iter()
            .collect();
        Project::from_input(
            Project::input_from_form(&fields),
            StoredImageReference {
                url: format!("https://img.example/{}.jpg", name),
                public_id: name.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn lists_newest_first_with_paging() {
        let repo = MemoryCollection::<Project>::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            let mut p = project(name);
            p.created_at = Utc::now() + Duration::seconds(i as i64);
            repo.insert(p).await.unwrap();
        }

        let all = repo.list(None).await.unwrap();
        let names: Vec<_> = all.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["c", "b", "a"]);

        let page = PageRequest::new(Some(2), Some(2));
        let second = repo.list(Some(page)).await.unwrap();
        assert_eq!(second.total, 3);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "a");
        assert_eq!(second.pagination(page).pages, 2);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let repo = MemoryCollection::<Project>::new();
        repo.insert(project("a")).await.unwrap();

        let page = PageRequest::new(Some(i64::MAX), Some(100));
        let listing = repo.list(Some(page)).await.unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.total, 1);
    }

    #[tokio::test]
    async fn replace_and_delete_unknown_ids() {
        let repo = MemoryCollection::<Project>::new();
        assert!(repo.replace(project("ghost")).await.unwrap().is_none());
        assert!(!repo.delete(Uuid::new_v4()).await.unwrap());

        let stored = repo.insert(project("real")).await.unwrap();
        assert!(repo.delete(stored.id).await.unwrap());
        assert!(!repo.delete(stored.id).await.unwrap());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn replace_bumps_updated_at() {
        let repo = MemoryCollection::<Project>::new();
        let mut stored = repo.insert(project("p")).await.unwrap();
        stored.description = "changed".into();
        let updated = repo.replace(stored.clone()).await.unwrap().unwrap();
        assert_eq!(updated.description, "changed");
        assert!(updated.updated_at >= stored.created_at);
    }

    #[tokio::test]
    async fn subscription_emails_are_unique() {
        let repo = MemoryCollection::<Subscription>::subscriptions();
        repo.insert(Subscription::new("a@example.com".into()))
            .await
            .unwrap();
        let err = repo
            .insert(Subscription::new("a@example.com".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == DUPLICATE_EMAIL));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn subscription_stats_and_active_listing() {
        let repo = MemoryCollection::<Subscription>::subscriptions();
        let mut old = Subscription::new("old@example.com".into());
        old.created_at = Utc::now() - Duration::days(45);
        repo.insert(old).await.unwrap();
        repo.insert(Subscription::new("new@example.com".into()))
            .await
            .unwrap();
        let mut gone = Subscription::new("gone@example.com".into());
        gone.unsubscribe(Utc::now());
        repo.insert(gone).await.unwrap();

        let stats = repo.stats(Utc::now() - Duration::days(30)).await.unwrap();
        assert_eq!(stats.total_subscriptions, 2);
        assert_eq!(stats.total_unsubscribed, 1);
        assert_eq!(stats.recent_subscriptions, 1);

        let active = repo.list_active(PageRequest::default()).await.unwrap();
        assert_eq!(active.total, 2);
        assert!(active.items.iter().all(|s| s.is_active));
        assert!(repo
            .find_by_email("gone@example.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn contacts_mark_read_and_count() {
        let repo = MemoryCollection::<Contact>::new();
        let contact = Contact::from_input(landmark_core::models::ContactInput {
            full_name: Some("Jane".into()),
            email: Some("jane@example.com".into()),
            mobile_number: Some("9876543210".into()),
            city: Some("Pune".into()),
            message: None,
        });
        let id = repo.insert(contact).await.unwrap().id;
        assert_eq!(repo.count_unread().await.unwrap(), 1);
        let read = repo.mark_read(id).await.unwrap().unwrap();
        assert!(read.is_read);
        assert_eq!(repo.count_unread().await.unwrap(), 0);
        assert!(repo.mark_read(Uuid::new_v4()).await.unwrap().is_none());
    }
}
