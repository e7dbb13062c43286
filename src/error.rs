//! Error types for the query core.
//!

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Bad page index, page size or ordering field. Raised before any session is acquired.
    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),
    /// Any failure reported by the storage collaborator, passed through uninterpreted.
    #[error("Data source error: {0}")]
    DataSource(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl QueryError {
    pub fn invalid_page_request(reason: impl Into<String>) -> Self {
        QueryError::InvalidPageRequest(reason.into())
    }

    pub fn data_source(reason: impl Into<String>) -> Self {
        QueryError::DataSource(reason.into())
    }

    pub fn is_invalid_page_request(&self) -> bool {
        matches!(self, QueryError::InvalidPageRequest(_))
    }

    pub fn is_data_source(&self) -> bool {
        matches!(self, QueryError::DataSource(_))
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        QueryError::DataSource(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for QueryError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        QueryError::DataSource(format!("migration failed: {err}"))
    }
}

impl From<config::ConfigError> for QueryError {
    fn from(err: config::ConfigError) -> Self {
        QueryError::Configuration(err.to_string())
    }
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
