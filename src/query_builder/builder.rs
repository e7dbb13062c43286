use super::{Column, Condition, Join, OrderBy, Pagination, PredicateSet, TableRef};
use sqlx::{Postgres, QueryBuilder};

/// A projected output column: `m.member_id AS member_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub column: Column,
    pub alias: &'static str,
}

impl Projection {
    pub const fn new(column: Column, alias: &'static str) -> Self {
        Self { column, alias }
    }

    pub fn to_sql(&self) -> String {
        format!("{} AS {}", self.column.qualified(), self.alias)
    }
}

/// Main query builder for filtered, ordered, paginated SELECTs.
///
/// Rendering goes through [`sqlx::QueryBuilder`], so every filter value is a bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    from: TableRef,
    projection: Vec<Projection>,
    joins: Vec<Join>,
    predicates: PredicateSet,
    order_by: Vec<OrderBy>,
    pagination: Option<Pagination>,
}

impl SelectQuery {
    /// Create a new query over the given table
    pub fn new(from: TableRef) -> Self {
        Self {
            from,
            projection: Vec::new(),
            joins: Vec::new(),
            predicates: PredicateSet::new(),
            order_by: Vec::new(),
            pagination: None,
        }
    }

    /// Set the projected columns
    pub fn select(mut self, projection: &[Projection]) -> Self {
        self.projection = projection.to_vec();
        self
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add a LEFT JOIN on `left = right`
    pub fn left_join(self, table: TableRef, left: Column, right: Column) -> Self {
        self.join(Join::left(table, left, right))
    }

    /// Replace the WHERE predicates
    pub fn filter(mut self, predicates: PredicateSet) -> Self {
        self.predicates = predicates;
        self
    }

    /// AND one optional condition onto the WHERE predicates
    pub fn and_where(mut self, unit: Option<Condition>) -> Self {
        self.predicates = self.predicates.and(unit);
        self
    }

    /// Add ORDER BY terms
    pub fn order_by(mut self, terms: &[OrderBy]) -> Self {
        self.order_by.extend_from_slice(terms);
        self
    }

    /// Append `column ASC` unless the ordering already mentions the column. Used to make
    /// ordering total so that consecutive pages never overlap or skip rows.
    pub fn tie_break(mut self, column: Column) -> Self {
        if !self.order_by.iter().any(|o| o.column == column) {
            self.order_by.push(OrderBy::asc(column));
        }
        self
    }

    /// Add pagination (LIMIT/OFFSET)
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Derive the count-only query for the same predicate set.
    ///
    /// Ordering, pagination and projection go away, and so does every join that cannot
    /// change the number of rows (see [`Join::affects_row_count`]).
    pub fn count_query(&self) -> CountQuery {
        let joins = self
            .joins
            .iter()
            .filter(|join| join.affects_row_count(&self.predicates))
            .cloned()
            .collect();

        CountQuery {
            from: self.from,
            joins,
            predicates: self.predicates.clone(),
        }
    }

    pub fn from_table(&self) -> TableRef {
        self.from
    }

    pub fn projection(&self) -> &[Projection] {
        &self.projection
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    /// Render into a sqlx builder with all values bound
    pub fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");

        if self.projection.is_empty() {
            qb.push(format!("{}.*", self.from.alias));
        } else {
            let fields: Vec<String> = self.projection.iter().map(Projection::to_sql).collect();
            qb.push(fields.join(", "));
        }

        qb.push(format!(" FROM {}", self.from.to_sql()));

        for join in &self.joins {
            qb.push(" ");
            qb.push(join.to_sql());
        }

        self.predicates.push_where(&mut qb);

        if !self.order_by.is_empty() {
            let terms: Vec<String> = self.order_by.iter().map(OrderBy::to_sql).collect();
            qb.push(format!(" ORDER BY {}", terms.join(", ")));
        }

        if let Some(ref pagination) = self.pagination {
            qb.push(pagination.to_sql());
        }

        qb
    }

    /// Build the complete SQL query string, with `$n` placeholders for values
    pub fn build_sql(&self) -> String {
        self.build().sql().to_string()
    }
}

/// A `SELECT COUNT(*)` over a predicate set, derived with [`SelectQuery::count_query`]
#[derive(Debug, Clone, PartialEq)]
pub struct CountQuery {
    from: TableRef,
    joins: Vec<Join>,
    predicates: PredicateSet,
}

impl CountQuery {
    pub fn from_table(&self) -> TableRef {
        self.from
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    pub fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", self.from.to_sql()));

        for join in &self.joins {
            qb.push(" ");
            qb.push(join.to_sql());
        }

        self.predicates.push_where(&mut qb);
        qb
    }

    pub fn build_sql(&self) -> String {
        self.build().sql().to_string()
    }
}
