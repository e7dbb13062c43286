#![allow(dead_code)] // Each test binary uses a different subset of these helpers

pub mod strategies;

use member_query_core::datasource::InMemoryDataSource;
use member_query_core::models::MemberTeamRow;

/// Member fixture: username, age and an optional index into the team list
#[derive(Debug, Clone)]
pub struct MemberFixture {
    pub username: String,
    pub age: i32,
    pub team: Option<usize>,
}

/// Team names used by generated fixtures
pub const TEAM_NAMES: [&str; 3] = ["A", "B", "C"];

/// alice (10) and bob (20) in team A, carol (30) in team B
pub fn seed_example() -> InMemoryDataSource {
    let source = InMemoryDataSource::new();
    let a = source.insert_team("A");
    let b = source.insert_team("B");
    source.insert_member("alice", 10, Some(&a));
    source.insert_member("bob", 20, Some(&a));
    source.insert_member("carol", 30, Some(&b));
    source
}

/// Load generated members into a fresh store, creating every team in [`TEAM_NAMES`]
pub fn seed_fixtures(members: &[MemberFixture]) -> InMemoryDataSource {
    let source = InMemoryDataSource::new();
    let teams: Vec<_> = TEAM_NAMES
        .iter()
        .map(|name| source.insert_team(name))
        .collect();
    for member in members {
        let team = member.team.and_then(|index| teams.get(index));
        source.insert_member(&member.username, member.age, team);
    }
    source
}

pub fn usernames(rows: &[MemberTeamRow]) -> Vec<String> {
    rows.iter().map(|row| row.username.clone()).collect()
}
