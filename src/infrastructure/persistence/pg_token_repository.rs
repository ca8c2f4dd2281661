//! PostgreSQL implementation of token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_QUERY_TIMEOUT, bounded};
use crate::domain::entities::{TokenRecord, TokenScope};
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct TokenRow {
    hash: Vec<u8>,
    user_id: i64,
    expiry: DateTime<Utc>,
    scope: String,
}

impl TryFrom<TokenRow> for TokenRecord {
    type Error = AppError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        let scope = row
            .scope
            .parse::<TokenScope>()
            .map_err(|e| AppError::internal("Corrupt token row", json!({ "reason": e })))?;

        Ok(TokenRecord {
            hash: row.hash,
            user_id: row.user_id,
            expiry: row.expiry,
            scope,
        })
    }
}

/// PostgreSQL repository for token digests.
///
/// Only keyed digests are stored. Plaintext tokens never reach this type.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgTokenRepository {
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
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn insert(&self, record: &TokenRecord) -> Result<(), AppError> {
        bounded(
            self.timeout,
            "tokens.insert",
            sqlx::query(
                r#"
                INSERT INTO tokens (hash, user_id, expiry, scope)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&record.hash)
            .bind(record.user_id)
            .bind(record.expiry)
            .bind(record.scope.as_str())
            .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }

    async fn find(
        &self,
        hash: &[u8],
        scope: TokenScope,
    ) -> Result<Option<TokenRecord>, AppError> {
        let row = bounded(
            self.timeout,
            "tokens.find",
            sqlx::query_as::<_, TokenRow>(
                r#"
                SELECT hash, user_id, expiry, scope
                FROM tokens
                WHERE hash = $1 AND scope = $2
                "#,
            )
            .bind(hash)
            .bind(scope.as_str())
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        row.map(TokenRecord::try_from).transpose()
    }

    async fn delete_all_for_user(
        &self,
        scope: TokenScope,
        user_id: i64,
    ) -> Result<u64, AppError> {
        let result = bounded(
            self.timeout,
            "tokens.delete_all_for_user",
            sqlx::query("DELETE FROM tokens WHERE scope = $1 AND user_id = $2")
                .bind(scope.as_str())
                .bind(user_id)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = bounded(
            self.timeout,
            "tokens.delete_expired",
            sqlx::query("DELETE FROM tokens WHERE expiry <= $1")
                .bind(now)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(result.rows_affected())
    }
}
