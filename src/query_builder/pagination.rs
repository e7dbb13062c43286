use super::Column;
use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One ORDER BY term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: Column,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(column: Column, direction: Direction) -> Self {
        Self { column, direction }
    }

    pub fn asc(column: Column) -> Self {
        Self::new(column, Direction::Asc)
    }

    pub fn desc(column: Column) -> Self {
        Self::new(column, Direction::Desc)
    }

    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column.qualified(), self.direction.to_sql())
    }
}

/// Represents pagination parameters for SQL queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// Create pagination with both limit and offset
    pub fn limit_offset(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        sql
    }

    /// Apply the window to an already ordered slice
    pub fn window<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self
            .offset
            .map_or(0, |o| usize::try_from(o).unwrap_or(usize::MAX))
            .min(rows.len());
        let end = match self.limit {
            Some(limit) => start
                .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
                .min(rows.len()),
            None => rows.len(),
        };
        &rows[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_offset() {
        let pagination = Pagination::limit_offset(10, 20);
        assert_eq!(pagination.to_sql(), " LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_window_clamps_to_slice() {
        let rows = [1, 2, 3, 4, 5];
        assert_eq!(Pagination::limit_offset(2, 0).window(&rows), &[1, 2]);
        assert_eq!(Pagination::limit_offset(2, 4).window(&rows), &[5]);
        assert!(Pagination::limit_offset(2, 9).window(&rows).is_empty());
        assert!(Pagination::limit_offset(1, i64::MAX).window(&rows).is_empty());
    }

    #[test]
    fn test_order_by_sql() {
        let age = Column::new("m", "age");
        assert_eq!(OrderBy::desc(age).to_sql(), "m.age DESC");
        assert_eq!(OrderBy::asc(age).to_sql(), "m.age ASC");
    }
}
