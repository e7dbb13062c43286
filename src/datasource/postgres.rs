use super::{QuerySession, SessionProvider};
use crate::error::QueryResult;
use crate::models::MemberTeamRow;
use crate::query_builder::{BulkStatement, CountQuery, SelectQuery};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres, Row};
use tracing::debug;

/// Sessions backed by a `sqlx` PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgSessionProvider {
    pool: PgPool,
}

impl PgSessionProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SessionProvider for PgSessionProvider {
    type Session = PgSession;

    async fn acquire(&self) -> QueryResult<PgSession> {
        let conn = self.pool.acquire().await?;
        Ok(PgSession { conn })
    }
}

/// A pooled connection; returned to the pool when dropped
pub struct PgSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl QuerySession for PgSession {
    async fn execute_query(&mut self, query: &SelectQuery) -> QueryResult<Vec<MemberTeamRow>> {
        let mut qb = query.build();
        debug!(sql = %qb.sql(), "executing search query");

        let rows = qb
            .build_query_as::<MemberTeamRow>()
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(rows)
    }

    async fn execute_count(&mut self, query: &CountQuery) -> QueryResult<i64> {
        let mut qb = query.build();
        debug!(sql = %qb.sql(), "executing count query");

        let row = qb.build().fetch_one(&mut *self.conn).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    async fn execute_statement(&mut self, statement: &BulkStatement) -> QueryResult<u64> {
        let mut qb = statement.build();
        debug!(sql = %qb.sql(), kind = ?statement.kind(), "executing bulk statement");

        let result = qb.build().execute(&mut *self.conn).await?;
        Ok(result.rows_affected())
    }
}
