//! Document store for Landmark
//!
//! Repository traits keyed by server-generated UUIDs, with a Postgres
//! implementation (sqlx) and an in-memory one used by the `memory` backend
//! and by tests. Listings are always ordered newest first.

pub mod memory;
pub mod postgres;
pub mod repository;

use std::sync::Arc;

use landmark_core::models::{Client, Contact, Project, Subscription};
use sqlx::PgPool;

pub use memory::MemoryCollection;
pub use postgres::{
    PgClientRepository, PgContactRepository, PgProjectRepository, PgSubscriptionRepository,
};
pub use repository::{ContactRepository, Listing, Repository, SubscriptionRepository};

/// The four collections, as trait objects so handlers don't care about the backend.
#[derive(Clone)]
pub struct Repositories {
    pub projects: Arc<dyn Repository<Project>>,
    pub clients: Arc<dyn Repository<Client>>,
    pub contacts: Arc<dyn ContactRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            projects: Arc::new(PgProjectRepository::new(pool.clone())),
            clients: Arc::new(PgClientRepository::new(pool.clone())),
            contacts: Arc::new(PgContactRepository::new(pool.clone())),
            subscriptions: Arc::new(PgSubscriptionRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            projects: Arc::new(MemoryCollection::<Project>::new()),
            clients: Arc::new(MemoryCollection::<Client>::new()),
            contacts: Arc::new(MemoryCollection::<Contact>::new()),
            subscriptions: Arc::new(MemoryCollection::<Subscription>::subscriptions()),
        }
    }
}
