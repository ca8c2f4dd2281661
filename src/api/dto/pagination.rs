//! Paging and sorting query parameters shared by list endpoints.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::listing::{ListQuery, resolve_list_query};
use crate::error::AppError;

/// Page size used when the client does not send one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Raw `page`, `page_size` and `sort` query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,

    #[serde(default)]
    pub sort: Option<String>,
}

impl ListParams {
    /// Applies defaults and validates against `safelist`.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: [`DEFAULT_PAGE_SIZE`]
    /// - `sort`: `default_sort` (also used for an empty `sort=`)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] listing every rejected field.
    pub fn resolve(
        &self,
        default_sort: &str,
        safelist: &'static [&'static str],
    ) -> Result<ListQuery, AppError> {
        let sort = self
            .sort
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(default_sort);

        resolve_list_query(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            sort,
            safelist,
        )
    }
}
