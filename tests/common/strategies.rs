use super::{MemberFixture, TEAM_NAMES};
use member_query_core::query_builder::Direction;
use member_query_core::search::{MemberSearchCondition, SortOrder};
use proptest::prelude::*;

/// Strategy for generating usernames from a small alphabet so that equality filters hit
pub fn username_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

/// Strategy for generating member fixtures
pub fn member_fixture_strategy() -> impl Strategy<Value = MemberFixture> {
    (
        username_strategy(),
        0i32..60,
        prop::option::of(0usize..TEAM_NAMES.len()),
    )
        .prop_map(|(username, age, team)| MemberFixture {
            username,
            age,
            team,
        })
}

/// Strategy for generating a member table of up to 40 rows
pub fn member_table_strategy() -> impl Strategy<Value = Vec<MemberFixture>> {
    prop::collection::vec(member_fixture_strategy(), 0..40)
}

/// Strategy for generating search conditions, each field independently present or absent
pub fn condition_strategy() -> impl Strategy<Value = MemberSearchCondition> {
    (
        prop::option::of(username_strategy()),
        prop::option::of(prop::sample::select(TEAM_NAMES.to_vec())),
        prop::option::of(0i32..60),
        prop::option::of(0i32..60),
    )
        .prop_map(|(username, team_name, age_goe, age_loe)| MemberSearchCondition {
            username,
            team_name: team_name.map(str::to_string),
            age_goe,
            age_loe,
        })
}

/// Strategy for generating sort orders over the searchable properties
pub fn sort_strategy() -> impl Strategy<Value = Vec<SortOrder>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["username", "age", "teamName", "memberId"]),
            prop_oneof![Just(Direction::Asc), Just(Direction::Desc)],
        )
            .prop_map(|(property, direction)| SortOrder::new(property, direction)),
        0..3,
    )
}

/// Strategy for generating valid page sizes
pub fn page_size_strategy() -> impl Strategy<Value = i64> {
    1i64..12
}
