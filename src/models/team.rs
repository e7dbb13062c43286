use crate::query_builder::{Column, TableRef};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Team a member may belong to
/// Maps to `team` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub team_id: i64,
    pub name: String,
}

impl Team {
    pub const TABLE: TableRef = TableRef::new("team", "t");
    pub const ID: Column = Column::new("t", "team_id");
    pub const NAME: Column = Column::new("t", "name");

    /// Create a new team
    pub async fn create(pool: &PgPool, name: &str) -> Result<Team, sqlx::Error> {
        sqlx::query_as::<_, Team>("INSERT INTO team (name) VALUES ($1) RETURNING team_id, name")
            .bind(name)
            .fetch_one(pool)
            .await
    }
}
