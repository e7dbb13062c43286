//! # Schema Migrations
//!
//! Migrations live in `migrations/` as `YYYYMMDDHHMMSS_description.sql` and are embedded at
//! compile time. `sqlx` records applied versions in `_sqlx_migrations` and serializes
//! concurrent runners with a PostgreSQL advisory lock, so parallel test processes can all
//! call [`DatabaseMigrations::run_all`] safely.

use crate::error::QueryResult;
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Apply every outstanding migration
    pub async fn run_all(pool: &PgPool) -> QueryResult<()> {
        MIGRATOR.run(pool).await?;
        info!(
            migrations = MIGRATOR.iter().count(),
            "Database schema is up to date"
        );
        Ok(())
    }

    /// Versions of the embedded migrations, oldest first
    pub fn versions() -> Vec<i64> {
        MIGRATOR.iter().map(|migration| migration.version).collect()
    }
}
