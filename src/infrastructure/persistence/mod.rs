//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx
//! prepared statements. Every statement runs under [`bounded`], which caps it
//! at the repository's timeout and cancels it on expiry.
//!
//! # Repositories
//!
//! - [`PgProductRepository`] - Product storage and listing
//! - [`PgReviewRepository`] - Review storage and listing
//! - [`PgUserRepository`] - Account storage
//! - [`PgTokenRepository`] - Token digest storage
//! - [`PgCatalogStats`] - Row counts for the admin CLI

pub mod pg_product_repository;
pub mod pg_review_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_product_repository::PgProductRepository;
pub use pg_review_repository::PgReviewRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use sqlx::PgPool;

use crate::error::AppError;

/// Default per-statement timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Runs `query` with a deadline.
///
/// The future is dropped when the deadline passes, which cancels the
/// statement; the caller sees [`AppError::Unavailable`]. SQLx errors are
/// converted through `From<sqlx::Error>`.
pub(crate) async fn bounded<T>(
    timeout: Duration,
    operation: &'static str,
    query: impl Future<Output = Result<T, sqlx::Error>>,
) -> Result<T, AppError> {
    match tokio::time::timeout(timeout, query).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "store operation timed out"
            );
            Err(AppError::unavailable(
                "Database operation timed out",
                json!({ "operation": operation }),
            ))
        }
    }
}

/// Explains why a version-guarded update matched no row.
///
/// `exists` is the result of probing the id after the update missed.
pub(crate) fn stale_update_error(
    exists: Result<bool, AppError>,
    entity: &'static str,
    id: i64,
    expected_version: i32,
) -> AppError {
    match exists {
        Ok(true) => AppError::edit_conflict(json!({
            "entity": entity,
            "id": id,
            "expected_version": expected_version,
        })),
        Ok(false) => AppError::not_found(
            format!("{entity} not found"),
            json!({ "id": id }),
        ),
        Err(e) => e,
    }
}

/// Connectivity probe used by the health endpoint.
pub struct PgHealthCheck {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgHealthCheck {
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

    pub async fn ping(&self) -> Result<(), AppError> {
        bounded(
            self.timeout,
            "health.ping",
            sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(self.pool.as_ref()),
        )
        .await
        .map(|_| ())
    }
}

/// Row counts shown by the admin CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub products: i64,
    pub reviews: i64,
    pub users: i64,
    pub activated_users: i64,
    pub live_tokens: i64,
}

/// Bounded row counts over the catalog tables.
pub struct PgCatalogStats {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgCatalogStats {
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

    pub async fn collect(&self) -> Result<TableCounts, AppError> {
        let pool = self.pool.as_ref();

        let products = bounded(
            self.timeout,
            "stats.products",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products").fetch_one(pool),
        )
        .await?;

        let reviews = bounded(
            self.timeout,
            "stats.reviews",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews").fetch_one(pool),
        )
        .await?;

        let (users, activated_users) = bounded(
            self.timeout,
            "stats.users",
            sqlx::query_as::<_, (i64, i64)>(
                "SELECT COUNT(*), COUNT(*) FILTER (WHERE activated) FROM users",
            )
            .fetch_one(pool),
        )
        .await?;

        let live_tokens = bounded(
            self.timeout,
            "stats.tokens",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tokens WHERE expiry > NOW()")
                .fetch_one(pool),
        )
        .await?;

        Ok(TableCounts {
            products,
            reviews,
            users,
            activated_users,
            live_tokens,
        })
    }
}
