use async_trait::async_trait;
use landmark_core::models::{Contact, PageRequest};
use landmark_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::window;
use crate::repository::{ContactRepository, Listing, Repository};

const COLUMNS: &str =
    "id, full_name, email, mobile_number, city, message, is_read, created_at, updated_at";

/// Repository for contact-form submissions
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Contact> for PgContactRepository {
    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "select"))]
    async fn list(&self, page: Option<PageRequest>) -> Result<Listing<Contact>, AppError> {
        let (limit, offset) = window(page);
        let items = sqlx::query_as::<Postgres, Contact>(&format!(
            "SELECT {COLUMNS} FROM contacts ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;

        Ok(Listing { items, total })
    }

    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<Postgres, Contact>(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "contacts", db.operation = "insert", db.record_id = %record.id))]
    async fn insert(&self, record: Contact) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<Postgres, Contact>(&format!(
            r#"
            INSERT INTO contacts (id, full_name, email, mobile_number, city, message, is_read, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(&record.mobile_number)
        .bind(&record.city)
        .bind(&record.message)
        .bind(record.is_read)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "contacts", db.operation = "update", db.record_id = %record.id))]
    async fn replace(&self, record: Contact) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<Postgres, Contact>(&format!(
            r#"
            UPDATE contacts
            SET full_name = $2, email = $3, mobile_number = $4, city = $5, message = $6,
                is_read = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(&record.mobile_number)
        .bind(&record.city)
        .bind(&record.message)
        .bind(record.is_read)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "update", db.record_id = %id))]
    async fn mark_read(&self, id: Uuid) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<Postgres, Contact>(&format!(
            "UPDATE contacts SET is_read = TRUE, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "count"))]
    async fn count_unread(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM contacts WHERE is_read = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
