//! Flattened member + team projection returned by searches.

use super::{Member, Team};
use crate::query_builder::{Column, ColumnSource, Projection, SqlValue};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One search result: a member left-joined with its team.
/// `team_id` and `team_name` are `None` for members without a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamRow {
    pub member_id: i64,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}

impl MemberTeamRow {
    /// Output columns, aliased to the field names `FromRow` reads
    pub const PROJECTION: [Projection; 5] = [
        Projection::new(Member::ID, "member_id"),
        Projection::new(Member::USERNAME, "username"),
        Projection::new(Member::AGE, "age"),
        Projection::new(Team::ID, "team_id"),
        Projection::new(Team::NAME, "team_name"),
    ];

    pub fn new(member: &Member, team: Option<&Team>) -> Self {
        Self {
            member_id: member.member_id,
            username: member.username.clone(),
            age: member.age,
            team_id: team.map(|t| t.team_id),
            team_name: team.map(|t| t.name.clone()),
        }
    }

    /// Resolve a sort property name to its column. Accepts the camelCase names used in
    /// serialized rows as well as the snake_case column names.
    pub fn sort_column(property: &str) -> Option<Column> {
        match property {
            "memberId" | "member_id" | "id" => Some(Member::ID),
            "username" => Some(Member::USERNAME),
            "age" => Some(Member::AGE),
            "teamId" | "team_id" => Some(Team::ID),
            "teamName" | "team_name" => Some(Team::NAME),
            _ => None,
        }
    }
}

impl ColumnSource for MemberTeamRow {
    fn column_value(&self, column: &Column) -> Option<SqlValue> {
        let value = match *column {
            c if c == Member::ID => SqlValue::from(self.member_id),
            c if c == Member::USERNAME => SqlValue::from(self.username.as_str()),
            c if c == Member::AGE => SqlValue::from(self.age),
            c if c == Member::TEAM_ID || c == Team::ID => SqlValue::from(self.team_id),
            c if c == Team::NAME => SqlValue::from(self.team_name.clone()),
            _ => return None,
        };
        Some(value)
    }
}
