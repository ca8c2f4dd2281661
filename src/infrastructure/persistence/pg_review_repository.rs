//! PostgreSQL implementation of review repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_QUERY_TIMEOUT, bounded, stale_update_error};
use crate::domain::entities::{NewReview, Review, ReviewFilter};
use crate::domain::listing::ListQuery;
use crate::domain::repositories::ReviewRepository;
use crate::error::AppError;

const REVIEW_COLUMNS: &str =
    "id, product_id, author, rating, comment, helpful_count, created_at, version";

#[derive(sqlx::FromRow)]
struct ReviewPageRow {
    total: i64,
    #[sqlx(flatten)]
    review: Review,
}

/// PostgreSQL repository for product reviews.
///
/// The product's `avg_rating` is refreshed by a trigger on the `reviews`
/// table, so it moves inside the same transaction as the review write.
pub struct PgReviewRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgReviewRepository {
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
        AppError::not_found("Review not found", json!({ "id": id }))
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn insert(&self, new_review: NewReview) -> Result<Review, AppError> {
        let sql = format!(
            "INSERT INTO reviews (product_id, author, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REVIEW_COLUMNS}"
        );

        bounded(
            self.timeout,
            "reviews.insert",
            sqlx::query_as::<_, Review>(&sql)
                .bind(new_review.product_id)
                .bind(&new_review.author)
                .bind(new_review.rating)
                .bind(&new_review.comment)
                .fetch_one(self.pool.as_ref()),
        )
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::not_found(
                    "Product not found",
                    json!({ "product_id": new_review.product_id }),
                )
            } else {
                e
            }
        })
    }

    async fn fetch(&self, id: i64) -> Result<Review, AppError> {
        if id < 1 {
            return Err(Self::not_found(id));
        }

        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        bounded(
            self.timeout,
            "reviews.fetch",
            sqlx::query_as::<_, Review>(&sql)
                .bind(id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    async fn fetch_for_product(&self, id: i64, product_id: i64) -> Result<Review, AppError> {
        if id < 1 || product_id < 1 {
            return Err(Self::not_found(id));
        }

        let sql =
            format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1 AND product_id = $2");
        bounded(
            self.timeout,
            "reviews.fetch_for_product",
            sqlx::query_as::<_, Review>(&sql)
                .bind(id)
                .bind(product_id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    async fn update(&self, review: &Review) -> Result<i32, AppError> {
        let new_version = bounded(
            self.timeout,
            "reviews.update",
            sqlx::query_scalar::<_, i32>(
                r#"
                UPDATE reviews
                SET author = $1, rating = $2, comment = $3, helpful_count = $4,
                    version = version + 1
                WHERE id = $5 AND version = $6
                RETURNING version
                "#,
            )
            .bind(&review.author)
            .bind(review.rating)
            .bind(&review.comment)
            .bind(review.helpful_count)
            .bind(review.id)
            .bind(review.version)
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        match new_version {
            Some(version) => Ok(version),
            None => Err(stale_update_error(
                self.exists(review.id).await,
                "Review",
                review.id,
                review.version,
            )),
        }
    }

    async fn increment_helpful(&self, id: i64) -> Result<Review, AppError> {
        if id < 1 {
            return Err(Self::not_found(id));
        }

        // Single statement increment; concurrent votes serialize on the row lock.
        let sql = format!(
            "UPDATE reviews SET helpful_count = helpful_count + 1, version = version + 1 \
             WHERE id = $1 \
             RETURNING {REVIEW_COLUMNS}"
        );
        bounded(
            self.timeout,
            "reviews.increment_helpful",
            sqlx::query_as::<_, Review>(&sql)
                .bind(id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        if id < 1 {
            return Err(Self::not_found(id));
        }

        let result = bounded(
            self.timeout,
            "reviews.delete",
            sqlx::query("DELETE FROM reviews WHERE id = $1")
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
            "reviews.exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM reviews WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        query: ListQuery,
    ) -> Result<(Vec<Review>, i64), AppError> {
        let sql = format!(
            r#"
            SELECT COUNT(*) OVER() AS total, {REVIEW_COLUMNS}
            FROM reviews
            WHERE (to_tsvector('simple', author) @@ plainto_tsquery('simple', $1) OR $1 = '')
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            query.sort.order_by("id")
        );

        let rows = bounded(
            self.timeout,
            "reviews.list",
            sqlx::query_as::<_, ReviewPageRow>(&sql)
                .bind(&filter.author)
                .bind(query.limit())
                .bind(query.offset())
                .fetch_all(self.pool.as_ref()),
        )
        .await?;

        let total = rows.first().map(|r| r.total).unwrap_or(0);
        Ok((rows.into_iter().map(|r| r.review).collect(), total))
    }

    async fn list_for_product(&self, product_id: i64) -> Result<Vec<Review>, AppError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = $1 ORDER BY created_at, id"
        );
        bounded(
            self.timeout,
            "reviews.list_for_product",
            sqlx::query_as::<_, Review>(&sql)
                .bind(product_id)
                .fetch_all(self.pool.as_ref()),
        )
        .await
    }
}
