//! Repository trait for product data access.

use crate::domain::entities::{NewProduct, Product, ProductFilter};
use crate::domain::listing::ListQuery;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for catalog products.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProductRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a product and returns it with id, `created_at` and `version = 1`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] on a unique constraint violation.
    async fn insert(&self, new_product: NewProduct) -> Result<Product, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no product has this id.
    async fn fetch(&self, id: i64) -> Result<Product, AppError>;

    /// Writes every mutable field and returns the new version.
    ///
    /// `avg_rating` is maintained by the store and is not written.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the product no longer exists
    /// - [`AppError::EditConflict`] if its version moved since it was read
    async fn update(&self, product: &Product) -> Result<i32, AppError>;

    /// Deletes a product and, by cascade, its reviews.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    async fn exists(&self, id: i64) -> Result<bool, AppError>;

    /// Returns one page of products and the total number of matches.
    async fn list(
        &self,
        filter: ProductFilter,
        query: ListQuery,
    ) -> Result<(Vec<Product>, i64), AppError>;
}
