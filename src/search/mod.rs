//! # Member Search
//!
//! Search inputs and outputs: the optional filter set, the predicate builders that turn it
//! into SQL conditions, and page requests/results.

pub mod condition;
pub mod page;
pub mod predicates;

pub use condition::MemberSearchCondition;
pub use page::{total_from_window, CountStrategy, Page, PageRequest, SortOrder};
