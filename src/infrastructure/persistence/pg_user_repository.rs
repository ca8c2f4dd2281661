//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_QUERY_TIMEOUT, bounded, stale_update_error};
use crate::domain::entities::{NewUser, User, UserFilter};
use crate::domain::listing::ListQuery;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const USER_COLUMNS: &str = "id, username, email, password_hash, activated, created_at, version";

#[derive(sqlx::FromRow)]
struct UserPageRow {
    total: i64,
    #[sqlx(flatten)]
    user: User,
}

/// Rewrites a violation of `users_email_key` into a field-level conflict.
fn duplicate_email(e: AppError) -> AppError {
    match e {
        AppError::Conflict { .. } => AppError::conflict(
            "A user with this email address already exists",
            json!({ "email": "a user with this email address already exists" }),
        ),
        other => other,
    }
}

/// PostgreSQL repository for user accounts.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgUserRepository {
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
        AppError::not_found("User not found", json!({ "id": id }))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, activated) \
             VALUES ($1, $2, $3, FALSE) \
             RETURNING {USER_COLUMNS}"
        );

        bounded(
            self.timeout,
            "users.insert",
            sqlx::query_as::<_, User>(&sql)
                .bind(&new_user.username)
                .bind(&new_user.email)
                .bind(&new_user.password_hash)
                .fetch_one(self.pool.as_ref()),
        )
        .await
        .map_err(duplicate_email)
    }

    async fn fetch(&self, id: i64) -> Result<User, AppError> {
        if id < 1 {
            return Err(Self::not_found(id));
        }

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        bounded(
            self.timeout,
            "users.fetch",
            sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    async fn fetch_by_email(&self, email: &str) -> Result<User, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        bounded(
            self.timeout,
            "users.fetch_by_email",
            sqlx::query_as::<_, User>(&sql)
                .bind(email)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or_else(|| AppError::not_found("User not found", json!({})))
    }

    async fn update(&self, user: &User) -> Result<i32, AppError> {
        let new_version = bounded(
            self.timeout,
            "users.update",
            sqlx::query_scalar::<_, i32>(
                r#"
                UPDATE users
                SET username = $1, email = $2, password_hash = $3, activated = $4,
                    version = version + 1
                WHERE id = $5 AND version = $6
                RETURNING version
                "#,
            )
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.activated)
            .bind(user.id)
            .bind(user.version)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
        .map_err(duplicate_email)?;

        match new_version {
            Some(version) => Ok(version),
            None => Err(stale_update_error(
                self.exists(user.id).await,
                "User",
                user.id,
                user.version,
            )),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        if id < 1 {
            return Err(Self::not_found(id));
        }

        let result = bounded(
            self.timeout,
            "users.delete",
            sqlx::query("DELETE FROM users WHERE id = $1")
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
            "users.exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn list(
        &self,
        filter: UserFilter,
        query: ListQuery,
    ) -> Result<(Vec<User>, i64), AppError> {
        let sql = format!(
            r#"
            SELECT COUNT(*) OVER() AS total, {USER_COLUMNS}
            FROM users
            WHERE (to_tsvector('simple', username) @@ plainto_tsquery('simple', $1) OR $1 = '')
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            query.sort.order_by("id")
        );

        let rows = bounded(
            self.timeout,
            "users.list",
            sqlx::query_as::<_, UserPageRow>(&sql)
                .bind(&filter.username)
                .bind(query.limit())
                .bind(query.offset())
                .fetch_all(self.pool.as_ref()),
        )
        .await?;

        let total = rows.first().map(|r| r.total).unwrap_or(0);
        Ok((rows.into_iter().map(|r| r.user).collect(), total))
    }
}
