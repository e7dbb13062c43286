use crate::query_builder::{Column, TableRef};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Member represents one searchable person, optionally assigned to a team
/// Maps to `member` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub member_id: i64,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
}

/// New Member for creation (without generated fields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
}

impl NewMember {
    pub fn new(username: impl Into<String>, age: i32, team_id: Option<i64>) -> Self {
        Self {
            username: username.into(),
            age,
            team_id,
        }
    }
}

impl Member {
    pub const TABLE: TableRef = TableRef::new("member", "m");
    pub const ID: Column = Column::new("m", "member_id");
    pub const USERNAME: Column = Column::new("m", "username");
    pub const AGE: Column = Column::new("m", "age");
    pub const TEAM_ID: Column = Column::new("m", "team_id");

    /// Create a new member
    pub async fn create(pool: &PgPool, new_member: NewMember) -> Result<Member, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO member (username, age, team_id)
            VALUES ($1, $2, $3)
            RETURNING member_id, username, age, team_id
            "#,
        )
        .bind(new_member.username)
        .bind(new_member.age)
        .bind(new_member.team_id)
        .fetch_one(pool)
        .await
    }

    /// List all members ordered by ID
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            "SELECT member_id, username, age, team_id FROM member ORDER BY member_id",
        )
        .fetch_all(pool)
        .await
    }
}
