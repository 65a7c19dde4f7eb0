use async_trait::async_trait;
use landmark_core::models::{Client, PageRequest};
use landmark_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::window;
use crate::repository::{Listing, Repository};

const COLUMNS: &str =
    "id, name, description, designation, image, image_public_id, created_at, updated_at";

/// Repository for client testimonials
#[derive(Clone)]
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Client> for PgClientRepository {
    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "select"))]
    async fn list(&self, page: Option<PageRequest>) -> Result<Listing<Client>, AppError> {
        let (limit, offset) = window(page);
        let items = sqlx::query_as::<Postgres, Client>(&format!(
            "SELECT {COLUMNS} FROM clients ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(Listing { items, total })
    }

    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let project = sqlx::query_as::<Postgres, Client>(&format!(
            "SELECT {COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "clients", db.operation = "insert", db.record_id = %record.id))]
    async fn insert(&self, record: Client) -> Result<Client, AppError> {
        let project = sqlx::query_as::<Postgres, Client>(&format!(
            r#"
            INSERT INTO clients (id, name, description, designation, image, image_public_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.designation)
        .bind(&record.image)
        .bind(&record.image_public_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "clients", db.operation = "update", db.record_id = %record.id))]
    async fn replace(&self, record: Client) -> Result<Option<Client>, AppError> {
        let project = sqlx::query_as::<Postgres, Client>(&format!(
            r#"
            UPDATE clients
            SET name = $2, description = $3, designation = $4, image = $5, image_public_id = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.designation)
        .bind(&record.image)
        .bind(&record.image_public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
