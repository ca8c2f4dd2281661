//! Review service.

use serde_json::json;
use std::sync::Arc;

use super::versioning::ensure_version;
use crate::domain::entities::{NewReview, Review, ReviewFilter, ReviewPatch, Versioned};
use crate::domain::listing::{ListQuery, PageMetadata};
use crate::domain::repositories::{ProductRepository, ReviewRepository};
use crate::error::AppError;

/// Service for product reviews.
///
/// Reviews always belong to an existing product; the product is checked
/// before a review is created or a product's reviews are listed.
pub struct ReviewService<R: ReviewRepository, P: ProductRepository> {
    review_repository: Arc<R>,
    product_repository: Arc<P>,
}

impl<R: ReviewRepository, P: ProductRepository> ReviewService<R, P> {
    pub fn new(review_repository: Arc<R>, product_repository: Arc<P>) -> Self {
        Self {
            review_repository,
            product_repository,
        }
    }

    async fn ensure_product(&self, product_id: i64) -> Result<(), AppError> {
        if self.product_repository.exists(product_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Product not found",
                json!({ "product_id": product_id }),
            ))
        }
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the product does not exist.
    pub async fn create(&self, new_review: NewReview) -> Result<Review, AppError> {
        self.ensure_product(new_review.product_id).await?;
        let review = self.review_repository.insert(new_review).await?;
        tracing::info!(
            review_id = review.id,
            product_id = review.product_id,
            "review created"
        );
        Ok(review)
    }

    pub async fn get(&self, id: i64) -> Result<Review, AppError> {
        self.review_repository.fetch(id).await
    }

    /// Fetches review `id` only if it belongs to `product_id`.
    pub async fn get_for_product(&self, id: i64, product_id: i64) -> Result<Review, AppError> {
        self.review_repository.fetch_for_product(id, product_id).await
    }

    pub async fn update(
        &self,
        id: i64,
        patch: ReviewPatch,
        expected_version: Option<i32>,
    ) -> Result<Review, AppError> {
        let mut review = self.review_repository.fetch(id).await?;
        ensure_version(&review, expected_version)?;

        review.apply(patch);
        let version = self.review_repository.update(&review).await?;
        review.set_version(version);

        Ok(review)
    }

    /// Records one helpful vote and returns the updated review.
    pub async fn mark_helpful(&self, id: i64) -> Result<Review, AppError> {
        self.review_repository.increment_helpful(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.review_repository.delete(id).await?;
        tracing::info!(review_id = id, "review deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        filter: ReviewFilter,
        query: ListQuery,
    ) -> Result<(Vec<Review>, PageMetadata), AppError> {
        let (reviews, total) = self.review_repository.list(filter, query).await?;
        Ok((reviews, query.metadata(total)))
    }

    /// Every review of one product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the product does not exist, so an
    /// unknown product is not confused with one that has no reviews.
    pub async fn list_for_product(&self, product_id: i64) -> Result<Vec<Review>, AppError> {
        self.ensure_product(product_id).await?;
        self.review_repository.list_for_product(product_id).await
    }
}
