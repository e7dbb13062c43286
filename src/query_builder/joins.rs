use super::{Column, Condition, PredicateSet};

/// A table together with the alias its columns are qualified by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    pub name: &'static str,
    pub alias: &'static str,
}

impl TableRef {
    pub const fn new(name: &'static str, alias: &'static str) -> Self {
        Self { name, alias }
    }

    pub fn to_sql(&self) -> String {
        format!("{} {}", self.name, self.alias)
    }
}

/// Represents different types of SQL JOINs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// Represents a SQL JOIN clause.
///
/// Joins are expected to follow a to-one relation (each primary row matches at most one
/// joined row), which is what allows a count query to drop a LEFT JOIN nobody filters on.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Condition,
}

impl Join {
    /// Create an INNER JOIN on `left = right`
    pub fn inner(table: TableRef, left: Column, right: Column) -> Self {
        Self {
            join_type: JoinType::Inner,
            table,
            on: Condition::columns_equal(left, right),
        }
    }

    /// Create a LEFT JOIN on `left = right`
    pub fn left(table: TableRef, left: Column, right: Column) -> Self {
        Self {
            join_type: JoinType::Left,
            table,
            on: Condition::columns_equal(left, right),
        }
    }

    /// Whether any predicate in the set reads a column of the joined table
    pub fn is_referenced_by(&self, predicates: &PredicateSet) -> bool {
        predicates.references_table(self.table.alias)
    }

    /// An inner join filters rows and must always stay; a to-one left join only adds
    /// columns and can go when the predicates never look at it.
    pub fn affects_row_count(&self, predicates: &PredicateSet) -> bool {
        self.join_type == JoinType::Inner || self.is_referenced_by(predicates)
    }

    /// Convert to SQL string. The ON clause only compares columns, so there is nothing to bind.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.join_type.to_sql(), self.table.to_sql());
        if let Condition::ColumnsEqual { left, right } = &self.on {
            sql.push_str(&format!(" ON {} = {}", left.qualified(), right.qualified()));
        }
        sql
    }
}
