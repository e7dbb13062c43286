//! # Database
//!
//! Pool construction from [`DatabaseConfig`](crate::config::DatabaseConfig) and the embedded
//! schema migrations for the `team` and `member` tables.
//!
//! ```rust,no_run
//! use member_query_core::config::QueryCoreConfig;
//! use member_query_core::database::{DatabaseConnection, DatabaseMigrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QueryCoreConfig::load()?;
//! let db = DatabaseConnection::connect(&config.database).await?;
//! DatabaseMigrations::run_all(db.pool()).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::{DatabaseMigrations, MIGRATOR};
