use super::predicates;
use crate::query_builder::PredicateSet;
use serde::{Deserialize, Serialize};

/// Optional filters for a member search. Every field left as `None` (or, for text fields,
/// set to a blank string) places no constraint on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    /// Inclusive lower bound on age
    pub age_goe: Option<i32>,
    /// Inclusive upper bound on age
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    /// The AND-set of every present filter
    pub fn predicates(&self) -> PredicateSet {
        PredicateSet::all_of([
            predicates::username_eq(self.username.as_deref()),
            predicates::team_name_eq(self.team_name.as_deref()),
            predicates::age_goe(self.age_goe),
            predicates::age_loe(self.age_loe),
        ])
    }

    pub fn is_unconstrained(&self) -> bool {
        self.predicates().is_empty()
    }
}
