//! Repository trait for bearer token storage.

use crate::domain::entities::{TokenRecord, TokenScope};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for token digests.
///
/// Only digests are stored; plaintext tokens never reach this layer. Rows are
/// inserted and deleted, never updated.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the digest already exists and
    /// [`AppError::NotFound`] if the user does not.
    async fn insert(&self, record: &TokenRecord) -> Result<(), AppError>;

    /// Looks up a token by digest and scope. Expiry is checked by the caller.
    async fn find(&self, hash: &[u8], scope: TokenScope)
    -> Result<Option<TokenRecord>, AppError>;

    /// Deletes every token of `scope` owned by `user_id`, returning how many.
    async fn delete_all_for_user(&self, scope: TokenScope, user_id: i64)
    -> Result<u64, AppError>;

    /// Deletes tokens whose expiry is at or before `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
