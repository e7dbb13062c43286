//! # Storage Collaborator
//!
//! The repository never talks to a database directly. It acquires a [`QuerySession`] from a
//! [`SessionProvider`], runs every statement of one call on it, and drops it on the way out,
//! on success and error alike.
//!
//! - [`postgres`] - sessions backed by pooled `sqlx` PostgreSQL connections
//! - [`memory`] - an in-process member/team store evaluating the same query objects

use crate::error::QueryResult;
use crate::models::MemberTeamRow;
use crate::query_builder::{BulkStatement, CountQuery, SelectQuery};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::{ExecutedStatement, InMemoryDataSource, InMemorySession};
pub use postgres::{PgSession, PgSessionProvider};

/// One connection's worth of query execution
#[async_trait]
pub trait QuerySession: Send {
    /// Run a SELECT (predicates, projection, ordering, window) and decode the rows
    async fn execute_query(&mut self, query: &SelectQuery) -> QueryResult<Vec<MemberTeamRow>>;

    /// Run a count-only query
    async fn execute_count(&mut self, query: &CountQuery) -> QueryResult<i64>;

    /// Run a bulk UPDATE or DELETE, returning the number of affected rows
    async fn execute_statement(&mut self, statement: &BulkStatement) -> QueryResult<u64>;
}

/// Hands out sessions scoped to a single repository call
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: QuerySession;

    async fn acquire(&self) -> QueryResult<Self::Session>;
}
