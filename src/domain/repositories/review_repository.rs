//! Repository trait for review data access.

use crate::domain::entities::{NewReview, Review, ReviewFilter};
use crate::domain::listing::ListQuery;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for product reviews.
///
/// Every write to a review refreshes the parent product's `avg_rating` in the
/// same transaction.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReviewRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the referenced product does not exist.
    async fn insert(&self, new_review: NewReview) -> Result<Review, AppError>;

    async fn fetch(&self, id: i64) -> Result<Review, AppError>;

    /// Fetches a review only if it belongs to `product_id`.
    async fn fetch_for_product(&self, id: i64, product_id: i64) -> Result<Review, AppError>;

    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the review no longer exists
    /// - [`AppError::EditConflict`] if its version moved since it was read
    async fn update(&self, review: &Review) -> Result<i32, AppError>;

    /// Adds one helpful vote. This is a mutation, so the version is bumped too.
    async fn increment_helpful(&self, id: i64) -> Result<Review, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;

    async fn exists(&self, id: i64) -> Result<bool, AppError>;

    async fn list(
        &self,
        filter: ReviewFilter,
        query: ListQuery,
    ) -> Result<(Vec<Review>, i64), AppError>;

    /// All reviews of one product, oldest first.
    async fn list_for_product(&self, product_id: i64) -> Result<Vec<Review>, AppError>;
}
