//! Safelisted sorting and bounded offset pagination for list endpoints.
//!
//! Untrusted query-string input is resolved here into a [`ListQuery`] before
//! any repository is called. The query layer only ever receives a
//! [`SortSpec`] whose column was taken from a server-defined safelist and a
//! [`PageRequest`] whose bounds were checked.
//!
//! # Flow
//!
//! 1. [`SortSpec::resolve`] rejects tokens not present in the safelist
//! 2. [`PageRequest::new`] rejects out-of-range page / page size
//! 3. The repository runs a single query returning rows and the total count
//! 4. [`PageMetadata::compute`] turns the count into response metadata

pub mod pagination;
pub mod sort;

pub use pagination::{MAX_PAGE, MAX_PAGE_SIZE, PageMetadata, PageRequest};
pub use sort::{SortDirection, SortSpec};

use serde_json::{Map, Value, json};

use crate::error::AppError;

/// Reasons a list request is rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("invalid sort value: {0}")]
    UnsafeSort(String),

    #[error("page must be between 1 and {MAX_PAGE}")]
    PageOutOfRange(u32),

    #[error("page_size must be between 1 and {MAX_PAGE_SIZE}")]
    PageSizeOutOfRange(u32),
}

impl ListingError {
    /// Query parameter the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ListingError::UnsafeSort(_) => "sort",
            ListingError::PageOutOfRange(_) => "page",
            ListingError::PageSizeOutOfRange(_) => "page_size",
        }
    }
}

impl From<ListingError> for AppError {
    fn from(e: ListingError) -> Self {
        AppError::bad_request(
            "Failed validation",
            json!({ e.field(): e.to_string() }),
        )
    }
}

/// Fully validated sort and page selection handed to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl ListQuery {
    pub fn new(sort: SortSpec, page: PageRequest) -> Self {
        Self { sort, page }
    }

    pub fn limit(&self) -> i64 {
        self.page.limit()
    }

    pub fn offset(&self) -> i64 {
        self.page.offset()
    }

    /// Page metadata for a result set of `total_records` rows.
    pub fn metadata(&self, total_records: i64) -> PageMetadata {
        PageMetadata::compute(total_records, self.page.page(), self.page.page_size())
    }
}

/// Resolves raw sort and paging input into a [`ListQuery`].
///
/// Every failing field is reported in a single validation error so the
/// client can fix all of them at once.
///
/// # Errors
///
/// Returns [`AppError::Validation`] with one entry per rejected field.
pub fn resolve_list_query(
    page: u32,
    page_size: u32,
    sort_token: &str,
    safelist: &'static [&'static str],
) -> Result<ListQuery, AppError> {
    let mut failures = Map::new();

    for e in pagination::validate(page, page_size) {
        failures.insert(e.field().to_string(), Value::String(e.to_string()));
    }

    let sort = match SortSpec::resolve(sort_token, safelist) {
        Ok(s) => Some(s),
        Err(e) => {
            failures.insert(e.field().to_string(), Value::String(e.to_string()));
            None
        }
    };

    match sort {
        Some(sort) if failures.is_empty() => {
            Ok(ListQuery::new(sort, PageRequest::new(page, page_size)?))
        }
        _ => Err(AppError::bad_request(
            "Failed validation",
            Value::Object(failures),
        )),
    }
}
