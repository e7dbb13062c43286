#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Member Query Core
//!
//! Dynamic search over a `member` table left-joined to its `team`, driven by a set of
//! optional filters. Absent filters simply drop out of the WHERE clause; present ones are
//! AND-ed together as bound parameters. Results come back whole or a page at a time.
//!
//! ## Paging and counting
//!
//! [`repository::MemberRepository::search_page`] returns one page and the total size of the
//! filtered set, using one of two [`search::CountStrategy`] values:
//!
//! - **Simple**: run the filtered query without a window once; its length is the total.
//! - **Complex**: fetch only the window, then count with a separate query that leaves out
//!   joins no filter refers to. The count query is skipped when the window already tells
//!   the total (a short first page, or a short non-empty later page).
//!
//! Ordering always ends with `member_id ASC`, so consecutive pages never overlap.
//!
//! ## Module Organization
//!
//! - [`search`] - search condition, predicate builders, page request/result
//! - [`query_builder`] - SELECT, COUNT and bulk UPDATE/DELETE construction on `sqlx::QueryBuilder`
//! - [`repository`] - the search, paging, count and bulk operations
//! - [`datasource`] - session abstraction with PostgreSQL and in-memory implementations
//! - [`models`] - `Member`, `Team` and the flattened `MemberTeamRow`
//! - [`database`] - pool construction and embedded migrations
//! - [`config`] - layered configuration
//! - [`logging`] - structured `tracing` setup
//! - [`error`] - error type shared by every operation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use member_query_core::config::QueryCoreConfig;
//! use member_query_core::database::{DatabaseConnection, DatabaseMigrations};
//! use member_query_core::datasource::PgSessionProvider;
//! use member_query_core::query_builder::Direction;
//! use member_query_core::repository::MemberRepository;
//! use member_query_core::search::{MemberSearchCondition, PageRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! member_query_core::logging::init_structured_logging();
//!
//! let config = QueryCoreConfig::load()?;
//! let db = DatabaseConnection::connect(&config.database).await?;
//! DatabaseMigrations::run_all(db.pool()).await?;
//!
//! let repository =
//!     MemberRepository::with_config(PgSessionProvider::new(db.pool().clone()), config.search);
//!
//! let condition = MemberSearchCondition::new().team_name("A").age_goe(15);
//! let page = repository
//!     .search_page(&condition, &PageRequest::of(0, 10).sorted_by("age", Direction::Desc))
//!     .await?;
//! println!("{} of {} members", page.number_of_elements(), page.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Repository behavior is tested against [`datasource::InMemoryDataSource`], which evaluates
//! the same query objects the PostgreSQL session renders. PostgreSQL tests are ignored by
//! default:
//!
//! ```bash
//! cargo test                                          # Unit and in-memory integration tests
//! DATABASE_URL=postgresql://... cargo test -- --ignored  # PostgreSQL tests
//! ```

pub mod config;
pub mod database;
pub mod datasource;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod search;

pub use config::{DatabaseConfig, QueryCoreConfig, SearchConfig};
pub use datasource::{InMemoryDataSource, PgSessionProvider, QuerySession, SessionProvider};
pub use error::{QueryError, QueryResult};
pub use models::{Member, MemberTeamRow, Team};
pub use repository::{MemberAssignment, MemberRepository};
pub use search::{CountStrategy, MemberSearchCondition, Page, PageRequest, SortOrder};
