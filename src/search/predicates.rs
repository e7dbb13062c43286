//! Optional predicate builders.
//!
//! Each returns `None` when its input is absent, which [`PredicateSet::all_of`] treats as
//! "no constraint". None of them ever produces a comparison against NULL or an
//! always-false condition.
//!
//! [`PredicateSet::all_of`]: crate::query_builder::PredicateSet::all_of

use crate::models::{Member, Team};
use crate::query_builder::Condition;

/// Text filters count only when they contain a non-whitespace character
fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn username_eq(username: Option<&str>) -> Option<Condition> {
    has_text(username).and_then(|u| Condition::eq(Member::USERNAME, u))
}

pub fn team_name_eq(team_name: Option<&str>) -> Option<Condition> {
    has_text(team_name).and_then(|t| Condition::eq(Team::NAME, t))
}

pub fn age_goe(age: Option<i32>) -> Option<Condition> {
    age.and_then(|a| Condition::goe(Member::AGE, a))
}

pub fn age_loe(age: Option<i32>) -> Option<Condition> {
    age.and_then(|a| Condition::loe(Member::AGE, a))
}
