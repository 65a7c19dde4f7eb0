use async_trait::async_trait;
use landmark_core::models::{PageRequest, Project};
use landmark_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::window;
use crate::repository::{Listing, Repository};

const COLUMNS: &str = "id, name, description, image, image_public_id, created_at, updated_at";

/// Repository for portfolio projects
#[derive(Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Project> for PgProjectRepository {
    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select"))]
    async fn list(&self, page: Option<PageRequest>) -> Result<Listing<Project>, AppError> {
        let (limit, offset) = window(page);
        let items = sqlx::query_as::<Postgres, Project>(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(Listing { items, total })
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "projects", db.operation = "insert", db.record_id = %record.id))]
    async fn insert(&self, record: Project) -> Result<Project, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(&format!(
            r#"
            INSERT INTO projects (id, name, description, image, image_public_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.image)
        .bind(&record.image_public_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "projects", db.operation = "update", db.record_id = %record.id))]
    async fn replace(&self, record: Project) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(&format!(
            r#"
            UPDATE projects
            SET name = $2, description = $3, image = $4, image_public_id = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.image)
        .bind(&record.image_public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
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
