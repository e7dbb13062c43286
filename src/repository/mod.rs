//! # Repositories
//!
//! Query entry points composed from [`crate::search`] inputs and [`crate::query_builder`]
//! statements, executed on sessions from a [`crate::datasource::SessionProvider`].

pub mod member_repository;

pub use member_repository::{MemberAssignment, MemberRepository};
