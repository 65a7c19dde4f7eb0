use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landmark_core::models::{PageRequest, Subscription, SubscriptionStats};
use landmark_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::{unique_violation, window};
use crate::repository::{Listing, Repository, SubscriptionRepository, DUPLICATE_EMAIL};

const COLUMNS: &str =
    "id, email, is_active, subscribed_at, unsubscribed_at, created_at, updated_at";

/// Repository for newsletter subscriptions
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Subscription> for PgSubscriptionRepository {
    #[tracing::instrument(skip(self), fields(db.table = "subscriptions", db.operation = "select"))]
    async fn list(&self, page: Option<PageRequest>) -> Result<Listing<Subscription>, AppError> {
        let (limit, offset) = window(page);
        let items = sqlx::query_as::<Postgres, Subscription>(&format!(
            "SELECT {COLUMNS} FROM subscriptions ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM subscriptions")
            .fetch_one(&self.pool)
            .await?;

        Ok(Listing { items, total })
    }

    #[tracing::instrument(skip(self), fields(db.table = "subscriptions", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Subscription>, AppError> {
        let subscription = sqlx::query_as::<Postgres, Subscription>(&format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "subscriptions", db.operation = "insert", db.record_id = %record.id))]
    async fn insert(&self, record: Subscription) -> Result<Subscription, AppError> {
        sqlx::query_as::<Postgres, Subscription>(&format!(
            r#"
            INSERT INTO subscriptions (id, email, is_active, subscribed_at, unsubscribed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.email)
        .bind(record.is_active)
        .bind(record.subscribed_at)
        .bind(record.unsubscribed_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_EMAIL))
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "subscriptions", db.operation = "update", db.record_id = %record.id))]
    async fn replace(&self, record: Subscription) -> Result<Option<Subscription>, AppError> {
        sqlx::query_as::<Postgres, Subscription>(&format!(
            r#"
            UPDATE subscriptions
            SET email = $2, is_active = $3, subscribed_at = $4, unsubscribed_at = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.email)
        .bind(record.is_active)
        .bind(record.subscribed_at)
        .bind(record.unsubscribed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_EMAIL))
    }

    #[tracing::instrument(skip(self), fields(db.table = "subscriptions", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    #[tracing::instrument(skip(self), fields(db.table = "subscriptions", db.operation = "select"))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscription>, AppError> {
        let subscription = sqlx::query_as::<Postgres, Subscription>(&format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    #[tracing::instrument(skip(self), fields(db.table = "subscriptions", db.operation = "select"))]
    async fn list_active(&self, page: PageRequest) -> Result<Listing<Subscription>, AppError> {
        let items = sqlx::query_as::<Postgres, Subscription>(&format!(
            r#"
            SELECT {COLUMNS} FROM subscriptions
            WHERE is_active = TRUE
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM subscriptions WHERE is_active = TRUE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(Listing { items, total })
    }

    #[tracing::instrument(skip(self), fields(db.table = "subscriptions", db.operation = "count"))]
    async fn stats(&self, since: DateTime<Utc>) -> Result<SubscriptionStats, AppError> {
        let (total_subscriptions, total_unsubscribed, recent_subscriptions) =
            sqlx::query_as::<Postgres, (i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*) FILTER (WHERE is_active),
                    COUNT(*) FILTER (WHERE NOT is_active),
                    COUNT(*) FILTER (WHERE is_active AND created_at >= $1)
                FROM subscriptions
                "#,
            )
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(SubscriptionStats {
            total_subscriptions,
            total_unsubscribed,
            recent_subscriptions,
        })
    }
}
