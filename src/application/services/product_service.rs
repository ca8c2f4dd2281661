//! Product catalog service.

use std::sync::Arc;

use super::versioning::ensure_version;
use crate::domain::entities::{NewProduct, Product, ProductFilter, ProductPatch, Versioned};
use crate::domain::listing::{ListQuery, PageMetadata};
use crate::domain::repositories::ProductRepository;
use crate::error::AppError;

/// Service for creating, editing and listing products.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let product = self.repository.insert(new_product).await?;
        tracing::info!(product_id = product.id, "product created");
        Ok(product)
    }

    pub async fn get(&self, id: i64) -> Result<Product, AppError> {
        self.repository.fetch(id).await
    }

    /// Applies `patch` to the stored product and writes it back.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the product does not exist
    /// - [`AppError::EditConflict`] if `expected_version` is stale, or another
    ///   writer got in between the read and the write
    pub async fn update(
        &self,
        id: i64,
        patch: ProductPatch,
        expected_version: Option<i32>,
    ) -> Result<Product, AppError> {
        let mut product = self.repository.fetch(id).await?;
        ensure_version(&product, expected_version)?;

        product.apply(patch);
        let version = self.repository.update(&product).await?;
        product.set_version(version);

        Ok(product)
    }

    /// Deletes a product together with its reviews.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        filter: ProductFilter,
        query: ListQuery,
    ) -> Result<(Vec<Product>, PageMetadata), AppError> {
        let (products, total) = self.repository.list(filter, query).await?;
        Ok((products, query.metadata(total)))
    }
}
