use crate::error::{QueryError, QueryResult};
use crate::query_builder::{Column, Direction, OrderBy, Pagination};
use serde::{Deserialize, Serialize};

/// How `search_page` arrives at the total row count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountStrategy {
    /// Run the filtered, joined query once without a window; its length is the total and
    /// the page is cut from it. Fine for small result sets.
    Simple,
    /// Fetch only the window, and count with a separate query that skips display-only
    /// joins. The count is skipped altogether when the window already tells the total.
    #[default]
    Complex,
}

/// Sort property by name, resolved to a column when the search runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub property: String,
    #[serde(default)]
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Asc)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Desc)
    }

    /// Resolve every order term, failing on the first unknown property
    pub fn resolve_all<F>(orders: &[SortOrder], resolve: F) -> QueryResult<Vec<OrderBy>>
    where
        F: Fn(&str) -> Option<Column>,
    {
        orders
            .iter()
            .map(|order| {
                resolve(&order.property)
                    .map(|column| OrderBy::new(column, order.direction))
                    .ok_or_else(|| {
                        QueryError::invalid_page_request(format!(
                            "unknown sort property '{}'",
                            order.property
                        ))
                    })
            })
            .collect()
    }
}

/// Zero-based page index, page size and ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    #[serde(default)]
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Unvalidated; checked by [`PageRequest::validate`] when the search runs
    pub fn of(page: i64, size: i64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, property: impl Into<String>, direction: Direction) -> Self {
        self.sort.push(SortOrder::new(property, direction));
        self
    }

    /// Row offset of the first element of this page
    pub fn offset(&self) -> Option<i64> {
        self.page.checked_mul(self.size)
    }

    /// Reject negative pages, non-positive sizes, sizes above `max_size` and offsets that
    /// overflow
    pub fn validate(&self, max_size: Option<i64>) -> QueryResult<()> {
        if self.size <= 0 {
            return Err(QueryError::invalid_page_request(format!(
                "page size must be positive, got {}",
                self.size
            )));
        }
        if self.page < 0 {
            return Err(QueryError::invalid_page_request(format!(
                "page index must not be negative, got {}",
                self.page
            )));
        }
        if let Some(max) = max_size {
            if self.size > max {
                return Err(QueryError::invalid_page_request(format!(
                    "page size {} exceeds the maximum of {max}",
                    self.size
                )));
            }
        }
        if self.offset().is_none() {
            return Err(QueryError::invalid_page_request(format!(
                "offset of page {} with size {} overflows",
                self.page, self.size
            )));
        }
        Ok(())
    }

    /// LIMIT/OFFSET for this page
    pub fn pagination(&self) -> QueryResult<Pagination> {
        let offset = self
            .offset()
            .ok_or_else(|| QueryError::invalid_page_request("page offset overflows"))?;
        Ok(Pagination::limit_offset(self.size, offset))
    }

    /// Map sort property names to columns; an unknown name is an invalid request
    pub fn resolve_sort<F>(&self, resolve: F) -> QueryResult<Vec<OrderBy>>
    where
        F: Fn(&str) -> Option<Column>,
    {
        SortOrder::resolve_all(&self.sort, resolve)
    }
}

/// One page of results and the total size of the filtered set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total: i64) -> Self {
        Self {
            content,
            total,
            page: request.page,
            size: request.size,
        }
    }

    /// Calculate total pages (ceiling division)
    pub fn total_pages(&self) -> i64 {
        if self.size <= 0 || self.total <= 0 {
            return 0;
        }
        self.total / self.size + i64::from(self.total % self.size != 0)
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn has_next(&self) -> bool {
        self.page
            .checked_add(1)
            .is_some_and(|next| next < self.total_pages())
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

}

/// Work out the total from the fetched window alone, when possible.
///
/// A first page shorter than the page size holds every row. A later page that is
/// non-empty but short is the last one, so the total is its offset plus its length.
/// Anything else needs a count query.
pub fn total_from_window(offset: i64, size: i64, content_len: usize) -> Option<i64> {
    let len = i64::try_from(content_len).ok()?;
    if offset == 0 {
        return (size > len).then_some(len);
    }
    if len > 0 && size > len {
        offset.checked_add(len)
    } else {
        None
    }
}
