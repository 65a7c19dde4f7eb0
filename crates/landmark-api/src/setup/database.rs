//! Document store setup

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use landmark_core::{Config, DatabaseBackend};
use landmark_db::Repositories;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Build the repositories for the configured backend.
pub async fn setup_repositories(config: &Config) -> Result<Repositories> {
    match config.database_backend() {
        DatabaseBackend::Postgres => {
            let pool = setup_database(config).await?;
            Ok(Repositories::postgres(pool))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory document store; records are lost on restart");
            Ok(Repositories::in_memory())
        }
    }
}

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url()
        .context("DATABASE_URL must be set when DATABASE_BACKEND=postgres")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
