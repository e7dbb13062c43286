use super::conditions::push_where_clause;
use super::{Column, Join, PredicateSet, SqlValue, TableRef};
use sqlx::{Postgres, QueryBuilder};

/// One `SET` term of a bulk UPDATE
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// `column = value`
    Set { column: Column, value: SqlValue },
    /// `column = alias.column + by`
    Increment { column: Column, by: SqlValue },
}

impl Assignment {
    pub fn column(&self) -> Column {
        match self {
            Assignment::Set { column, .. } | Assignment::Increment { column, .. } => *column,
        }
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            // SET targets are never qualified in PostgreSQL
            Assignment::Set { column, value } => {
                qb.push(format!("{} = ", column.name()));
                value.push_bind(qb);
            }
            Assignment::Increment { column, by } => {
                qb.push(format!("{} = {} + ", column.name(), column.qualified()));
                by.push_bind(qb);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkKind {
    Update,
    Delete,
}

/// A set-based UPDATE or DELETE over one table.
///
/// Related tables are brought in with `UPDATE .. FROM` / `DELETE .. USING`, their join
/// condition moved into the WHERE clause, which gives inner-join semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkStatement {
    kind: BulkKind,
    target: TableRef,
    assignments: Vec<Assignment>,
    joins: Vec<Join>,
    predicates: PredicateSet,
}

impl BulkStatement {
    pub fn update(target: TableRef) -> Self {
        Self::new(BulkKind::Update, target)
    }

    pub fn delete(target: TableRef) -> Self {
        Self::new(BulkKind::Delete, target)
    }

    fn new(kind: BulkKind, target: TableRef) -> Self {
        Self {
            kind,
            target,
            assignments: Vec::new(),
            joins: Vec::new(),
            predicates: PredicateSet::new(),
        }
    }

    pub fn assign(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn filter(mut self, predicates: PredicateSet) -> Self {
        self.predicates = predicates;
        self
    }

    /// Bring in a related table, but only if the current predicates read from it.
    /// Call after [`BulkStatement::filter`].
    pub fn join_if_referenced(mut self, join: Join) -> Self {
        if join.is_referenced_by(&self.predicates) {
            self.joins.push(join);
        }
        self
    }

    pub fn kind(&self) -> BulkKind {
        self.kind
    }

    pub fn target(&self) -> TableRef {
        self.target
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    pub fn build(&self) -> QueryBuilder<'static, Postgres> {
        let related: Vec<String> = self.joins.iter().map(|j| j.table.to_sql()).collect();

        let mut qb = match self.kind {
            BulkKind::Update => {
                let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", self.target.to_sql()));
                for (i, assignment) in self.assignments.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    assignment.push_sql(&mut qb);
                }
                if !related.is_empty() {
                    qb.push(format!(" FROM {}", related.join(", ")));
                }
                qb
            }
            BulkKind::Delete => {
                let mut qb = QueryBuilder::new(format!("DELETE FROM {}", self.target.to_sql()));
                if !related.is_empty() {
                    qb.push(format!(" USING {}", related.join(", ")));
                }
                qb
            }
        };

        let conditions = self
            .joins
            .iter()
            .map(|j| &j.on)
            .chain(self.predicates.iter());
        push_where_clause(&mut qb, conditions);
        qb
    }

    pub fn build_sql(&self) -> String {
        self.build().sql().to_string()
    }
}
