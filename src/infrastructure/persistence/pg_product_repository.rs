//! PostgreSQL implementation of product repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_QUERY_TIMEOUT, bounded, stale_update_error};
use crate::domain::entities::{NewProduct, Product, ProductFilter};
use crate::domain::listing::ListQuery;
use crate::domain::repositories::ProductRepository;
use crate::error::AppError;

const PRODUCT_COLUMNS: &str =
    "id, name, description, category, image_url, price, avg_rating, created_at, version";

#[derive(sqlx::FromRow)]
struct ProductPageRow {
    total: i64,
    #[sqlx(flatten)]
    product: Product,
}

/// PostgreSQL repository for catalog products.
pub struct PgProductRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgProductRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn not_found(id: i64) -> AppError {
        AppError::not_found("Product not found", json!({ "id": id }))
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO products (name, description, category, image_url, price) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PRODUCT_COLUMNS}"
        );

        bounded(
            self.timeout,
            "products.insert",
            sqlx::query_as::<_, Product>(&sql)
                .bind(&new_product.name)
                .bind(&new_product.description)
                .bind(&new_product.category)
                .bind(&new_product.image_url)
                .bind(&new_product.price)
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn fetch(&self, id: i64) -> Result<Product, AppError> {
        if id < 1 {
            return Err(Self::not_found(id));
        }

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        bounded(
            self.timeout,
            "products.fetch",
            sqlx::query_as::<_, Product>(&sql)
                .bind(id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    async fn update(&self, product: &Product) -> Result<i32, AppError> {
        let new_version = bounded(
            self.timeout,
            "products.update",
            sqlx::query_scalar::<_, i32>(
                r#"
                UPDATE products
                SET name = $1, description = $2, category = $3, image_url = $4, price = $5,
                    version = version + 1
                WHERE id = $6 AND version = $7
                RETURNING version
                "#,
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.category)
            .bind(&product.image_url)
            .bind(&product.price)
            .bind(product.id)
            .bind(product.version)
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        match new_version {
            Some(version) => Ok(version),
            None => Err(stale_update_error(
                self.exists(product.id).await,
                "Product",
                product.id,
                product.version,
            )),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        if id < 1 {
            return Err(Self::not_found(id));
        }

        let result = bounded(
            self.timeout,
            "products.delete",
            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id)
                .execute(self.pool.as_ref()),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        if id < 1 {
            return Ok(false);
        }

        bounded(
            self.timeout,
            "products.exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn list(
        &self,
        filter: ProductFilter,
        query: ListQuery,
    ) -> Result<(Vec<Product>, i64), AppError> {
        // The ORDER BY column comes from a static safelist, never from input.
        let sql = format!(
            r#"
            SELECT COUNT(*) OVER() AS total, {PRODUCT_COLUMNS}
            FROM products
            WHERE (to_tsvector('simple', name) @@ plainto_tsquery('simple', $1) OR $1 = '')
              AND (to_tsvector('simple', category) @@ plainto_tsquery('simple', $2) OR $2 = '')
            ORDER BY {}
            LIMIT $3 OFFSET $4
            "#,
            query.sort.order_by("id")
        );

        let rows = bounded(
            self.timeout,
            "products.list",
            sqlx::query_as::<_, ProductPageRow>(&sql)
                .bind(&filter.name)
                .bind(&filter.category)
                .bind(query.limit())
                .bind(query.offset())
                .fetch_all(self.pool.as_ref()),
        )
        .await?;

        let total = rows.first().map(|r| r.total).unwrap_or(0);
        Ok((rows.into_iter().map(|r| r.product).collect(), total))
    }
}
