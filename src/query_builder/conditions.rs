use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};
use std::cmp::Ordering;

/// A column qualified by the alias of the table it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    table: &'static str,
    name: &'static str,
}

impl Column {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self { table, name }
    }

    /// Alias of the owning table
    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `alias.name`
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

/// A typed value bound as a query parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i32),
    BigInt(i64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Compare two non-null values of compatible types. Integers of either width compare
    /// numerically; anything else (including NULL) is incomparable.
    pub fn compare(&self, other: &SqlValue) -> Option<Ordering> {
        match (self, other) {
            (SqlValue::Text(a), SqlValue::Text(b)) => Some(a.cmp(b)),
            (SqlValue::Integer(a), SqlValue::Integer(b)) => Some(a.cmp(b)),
            (SqlValue::BigInt(a), SqlValue::BigInt(b)) => Some(a.cmp(b)),
            (SqlValue::Integer(a), SqlValue::BigInt(b)) => Some(i64::from(*a).cmp(b)),
            (SqlValue::BigInt(a), SqlValue::Integer(b)) => Some(a.cmp(&i64::from(*b))),
            _ => None,
        }
    }

    /// Append this value as a bound parameter. NULL only reaches here on the right of a
    /// SET; comparisons never carry it.
    pub(crate) fn push_bind(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            SqlValue::Null => {
                qb.push("NULL");
            }
            SqlValue::Integer(v) => {
                qb.push_bind(*v);
            }
            SqlValue::BigInt(v) => {
                qb.push_bind(*v);
            }
            SqlValue::Text(v) => {
                qb.push_bind(v.clone());
            }
        }
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::BigInt(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Anything that can report the value of a qualified column. Implemented by joined records
/// in the in-memory source and by projected rows, so predicates can be checked outside SQL.
pub trait ColumnSource {
    /// `None` means the column is unknown to this source; it evaluates like NULL.
    fn column_value(&self, column: &Column) -> Option<SqlValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gte,
    Lte,
}

impl CompareOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Represents different types of SQL conditions
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: Column,
        op: CompareOp,
        value: SqlValue,
    },
    ColumnsEqual {
        left: Column,
        right: Column,
    },
}

impl Condition {
    /// `column op value`, or `None` for a NULL value: a comparison against NULL never
    /// holds, so it is not built at all.
    pub fn compare(column: Column, op: CompareOp, value: impl Into<SqlValue>) -> Option<Self> {
        let value = value.into();
        (!value.is_null()).then_some(Condition::Compare { column, op, value })
    }

    pub fn eq(column: Column, value: impl Into<SqlValue>) -> Option<Self> {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn goe(column: Column, value: impl Into<SqlValue>) -> Option<Self> {
        Self::compare(column, CompareOp::Gte, value)
    }

    pub fn loe(column: Column, value: impl Into<SqlValue>) -> Option<Self> {
        Self::compare(column, CompareOp::Lte, value)
    }

    pub fn columns_equal(left: Column, right: Column) -> Self {
        Condition::ColumnsEqual { left, right }
    }

    /// Every column this condition reads
    pub fn columns(&self) -> Vec<Column> {
        match self {
            Condition::Compare { column, .. } => vec![*column],
            Condition::ColumnsEqual { left, right } => vec![*left, *right],
        }
    }

    pub fn references_table(&self, alias: &str) -> bool {
        self.columns().iter().any(|c| c.table() == alias)
    }

    fn compares_with_null(&self) -> bool {
        matches!(self, Condition::Compare { value, .. } if value.is_null())
    }

    /// Append the condition with its values as bound parameters
    pub(crate) fn push_sql(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Condition::Compare { column, op, value } => {
                qb.push(format!("{} {} ", column.qualified(), op.to_sql()));
                value.push_bind(qb);
            }
            Condition::ColumnsEqual { left, right } => {
                qb.push(format!("{} = {}", left.qualified(), right.qualified()));
            }
        }
    }

    /// Evaluate with SQL semantics: any comparison involving NULL is not satisfied.
    pub fn evaluate<R: ColumnSource + ?Sized>(&self, row: &R) -> bool {
        let value_of = |column: &Column| row.column_value(column).unwrap_or(SqlValue::Null);

        match self {
            Condition::Compare { column, op, value } => value_of(column)
                .compare(value)
                .is_some_and(|ordering| op.holds(ordering)),
            Condition::ColumnsEqual { left, right } => {
                value_of(left).compare(&value_of(right)) == Some(Ordering::Equal)
            }
        }
    }
}

/// Conditions combined with AND.
///
/// Built from optional units: a `None` unit means "no constraint" and is dropped before
/// combining, so an absent filter never turns into a comparison against NULL. A
/// hand-built comparison with a NULL value is dropped the same way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    conditions: Vec<Condition>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine the present units, skipping the omitted ones
    pub fn all_of<I>(units: I) -> Self
    where
        I: IntoIterator<Item = Option<Condition>>,
    {
        Self {
            conditions: units
                .into_iter()
                .flatten()
                .filter(|c| !c.compares_with_null())
                .collect(),
        }
    }

    pub fn and(mut self, unit: Option<Condition>) -> Self {
        self.conditions.extend(unit.filter(|c| !c.compares_with_null()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn references_table(&self, alias: &str) -> bool {
        self.conditions.iter().any(|c| c.references_table(alias))
    }

    /// True when every condition holds; an empty set matches everything
    pub fn matches<R: ColumnSource + ?Sized>(&self, row: &R) -> bool {
        self.conditions.iter().all(|c| c.evaluate(row))
    }

    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        push_where_clause(qb, self.conditions.iter());
    }
}

/// Append ` WHERE a AND b ...`, or nothing when there are no conditions
pub(crate) fn push_where_clause<'a, I>(qb: &mut QueryBuilder<'static, Postgres>, conditions: I)
where
    I: IntoIterator<Item = &'a Condition>,
{
    for (i, condition) in conditions.into_iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        condition.push_sql(qb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const NAME: Column = Column::new("m", "username");
    const AGE: Column = Column::new("m", "age");
    const TEAM: Column = Column::new("t", "name");

    struct MapRow(HashMap<Column, SqlValue>);

    impl ColumnSource for MapRow {
        fn column_value(&self, column: &Column) -> Option<SqlValue> {
            self.0.get(column).cloned()
        }
    }

    fn row(name: &str, age: i32, team: Option<&str>) -> MapRow {
        let mut values = HashMap::new();
        values.insert(NAME, SqlValue::from(name));
        values.insert(AGE, SqlValue::from(age));
        values.insert(TEAM, SqlValue::from(team));
        MapRow(values)
    }

    fn render(set: &PredicateSet) -> String {
        let mut qb = QueryBuilder::new("SELECT 1");
        set.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_omitted_units_are_dropped() {
        let set = PredicateSet::all_of([None, Condition::goe(AGE, 10), None]);
        assert_eq!(set.len(), 1);
        assert_eq!(render(&set), "SELECT 1 WHERE m.age >= $1");
    }

    #[test]
    fn test_empty_set_renders_no_where_clause() {
        let set = PredicateSet::all_of([None, None]);
        assert!(set.is_empty());
        assert_eq!(render(&set), "SELECT 1");
        assert!(set.matches(&row("alice", 10, None)));
    }

    #[test]
    fn test_conditions_are_anded_with_numbered_placeholders() {
        let set = PredicateSet::new()
            .and(Condition::eq(TEAM, "A"))
            .and(Condition::goe(AGE, 15))
            .and(Condition::loe(AGE, 40));
        assert_eq!(
            render(&set),
            "SELECT 1 WHERE t.name = $1 AND m.age >= $2 AND m.age <= $3"
        );
    }

    #[test]
    fn test_null_values_never_become_comparisons() {
        assert_eq!(Condition::eq(TEAM, None::<&str>), None);
        assert_eq!(Condition::goe(AGE, SqlValue::Null), None);

        let set = PredicateSet::all_of([Condition::eq(TEAM, None::<&str>)]);
        assert!(set.is_empty());
        assert_eq!(render(&set), "SELECT 1");

        let hand_built = Condition::Compare {
            column: TEAM,
            op: CompareOp::Eq,
            value: SqlValue::Null,
        };
        let set = PredicateSet::all_of([Some(hand_built.clone()), Condition::eq(NAME, "a")])
            .and(Some(hand_built));
        assert_eq!(render(&set), "SELECT 1 WHERE m.username = $1");
    }

    #[test]
    fn test_evaluate_follows_sql_null_semantics() {
        let holds = |condition: Option<Condition>, row: &MapRow| {
            PredicateSet::all_of([condition]).matches(row)
        };

        let teamless = row("dave", 40, None);
        assert!(!holds(Condition::eq(TEAM, "A"), &teamless));
        assert!(!holds(Condition::loe(TEAM, "Z"), &teamless));

        let member = row("alice", 10, Some("A"));
        assert!(holds(Condition::eq(TEAM, "A"), &member));
        assert!(holds(Condition::goe(AGE, 10), &member));
        assert!(!holds(Condition::goe(AGE, 11), &member));
        assert!(holds(Condition::loe(AGE, 10), &member));
    }

    #[test]
    fn test_integer_widths_compare_numerically() {
        assert_eq!(
            SqlValue::Integer(5).compare(&SqlValue::BigInt(5)),
            Some(Ordering::Equal)
        );
        assert_eq!(SqlValue::Text("a".into()).compare(&SqlValue::Integer(1)), None);
        assert_eq!(SqlValue::Null.compare(&SqlValue::Null), None);
    }

    #[test]
    fn test_references_table() {
        let set = PredicateSet::all_of([Condition::goe(AGE, 1)]);
        assert!(set.references_table("m"));
        assert!(!set.references_table("t"));
        assert!(set.and(Condition::eq(TEAM, "B")).references_table("t"));
    }
}
