//! Page bounds and page metadata.

use serde::Serialize;

use super::ListingError;

/// Deepest page a client may request. Offset scans grow with page depth.
pub const MAX_PAGE: u32 = 500;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Checks page bounds, returning every violation found.
pub fn validate(page: u32, page_size: u32) -> Vec<ListingError> {
    let mut errors = Vec::new();
    if !(1..=MAX_PAGE).contains(&page) {
        errors.push(ListingError::PageOutOfRange(page));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        errors.push(ListingError::PageSizeOutOfRange(page_size));
    }
    errors
}

/// A validated page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// # Errors
    ///
    /// Returns the first bound violated: `page` outside `1..=500` or
    /// `page_size` outside `1..=100`.
    pub fn new(page: u32, page_size: u32) -> Result<Self, ListingError> {
        match validate(page, page_size).into_iter().next() {
            Some(e) => Err(e),
            None => Ok(Self { page, page_size }),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

/// Pagination details returned alongside a page of rows.
///
/// An empty result set yields the all-zero value, which serializes to `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl PageMetadata {
    pub fn compute(total_records: i64, page: u32, page_size: u32) -> Self {
        if total_records <= 0 || page_size == 0 {
            return Self::default();
        }

        let page_size = i64::from(page_size);
        Self {
            current_page: i64::from(page),
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_accepted() {
        for (page, size) in [(1, 1), (1, 100), (500, 1), (500, 100), (250, 50)] {
            assert!(PageRequest::new(page, size).is_ok(), "{page}/{size}");
        }
    }

    #[test]
    fn test_bounds_rejected() {
        assert_eq!(
            PageRequest::new(0, 10).unwrap_err(),
            ListingError::PageOutOfRange(0)
        );
        assert_eq!(
            PageRequest::new(501, 10).unwrap_err(),
            ListingError::PageOutOfRange(501)
        );
        assert_eq!(
            PageRequest::new(1, 0).unwrap_err(),
            ListingError::PageSizeOutOfRange(0)
        );
        assert_eq!(
            PageRequest::new(1, 101).unwrap_err(),
            ListingError::PageSizeOutOfRange(101)
        );
    }

    #[test]
    fn test_validate_collects_both_violations() {
        assert_eq!(validate(0, 0).len(), 2);
        assert!(validate(1, 1).is_empty());
    }

    #[test]
    fn test_limit_and_offset() {
        let p = PageRequest::new(3, 25).unwrap();
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 50);

        let first = PageRequest::new(1, 10).unwrap();
        assert_eq!(first.offset(), 0);

        let deepest = PageRequest::new(MAX_PAGE, MAX_PAGE_SIZE).unwrap();
        assert_eq!(deepest.offset(), 49_900);
    }

    #[test]
    fn test_metadata_empty_result() {
        assert_eq!(PageMetadata::compute(0, 1, 10), PageMetadata::default());
        assert_eq!(PageMetadata::compute(0, 7, 3), PageMetadata::default());
        assert!(PageMetadata::compute(0, 7, 3).is_empty());
    }

    #[test]
    fn test_metadata_computation() {
        let meta = PageMetadata::compute(23, 1, 10);
        assert_eq!(
            meta,
            PageMetadata {
                current_page: 1,
                page_size: 10,
                first_page: 1,
                last_page: 3,
                total_records: 23,
            }
        );
    }

    #[test]
    fn test_metadata_exact_multiple() {
        assert_eq!(PageMetadata::compute(20, 2, 10).last_page, 2);
        assert_eq!(PageMetadata::compute(1, 1, 100).last_page, 1);
    }

    #[test]
    fn test_empty_metadata_serializes_to_empty_object() {
        let json = serde_json::to_value(PageMetadata::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_metadata_serialization() {
        let json = serde_json::to_value(PageMetadata::compute(23, 2, 10)).unwrap();
        assert_eq!(json["current_page"], 2);
        assert_eq!(json["last_page"], 3);
        assert_eq!(json["first_page"], 1);
    }
}
