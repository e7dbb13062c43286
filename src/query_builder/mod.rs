//! # Query Builder System
//!
//! Type-safe composition of filtered, joined, paginated SQL over PostgreSQL.
//!
//! ## Key Components
//!
//! - [`conditions`] - Typed columns and values, conditions, and [`PredicateSet`]
//! - [`joins`] - Table references and JOIN clauses
//! - [`pagination`] - ORDER BY terms and LIMIT/OFFSET windows
//! - [`builder`] - [`SelectQuery`] and its derived [`CountQuery`]
//! - [`statement`] - Set-based UPDATE/DELETE ([`BulkStatement`])
//!
//! ## Optional Predicates
//!
//! Filter builders return `Option<Condition>`. `None` stands for "no constraint" and is
//! dropped when the units are combined with AND. The comparison constructors themselves
//! return `None` for a NULL value, so no unit ever compares against NULL:
//!
//! ```rust
//! use member_query_core::query_builder::{Column, Condition, PredicateSet};
//!
//! const AGE: Column = Column::new("m", "age");
//!
//! fn age_goe(bound: Option<i32>) -> Option<Condition> {
//!     bound.and_then(|b| Condition::goe(AGE, b))
//! }
//!
//! let predicates = PredicateSet::all_of([age_goe(None), age_goe(Some(18))]);
//! assert_eq!(predicates.len(), 1);
//! ```
//!
//! ## Count Queries
//!
//! [`SelectQuery::count_query`] keeps the predicate set but drops ordering, the window,
//! the projection, and any LEFT JOIN that no predicate reads from, so totals are computed
//! without materializing display-only joined data.

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod pagination;
pub mod statement;

pub use builder::{CountQuery, Projection, SelectQuery};
pub use conditions::{Column, ColumnSource, CompareOp, Condition, PredicateSet, SqlValue};
pub use joins::{Join, JoinType, TableRef};
pub use pagination::{Direction, OrderBy, Pagination};
pub use statement::{Assignment, BulkKind, BulkStatement};
