//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User, UserFilter};
use crate::domain::listing::ListQuery;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] with an `email` detail if the address is taken.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn fetch(&self, id: i64) -> Result<User, AppError>;

    async fn fetch_by_email(&self, email: &str) -> Result<User, AppError>;

    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the user no longer exists
    /// - [`AppError::EditConflict`] if its version moved since it was read
    /// - [`AppError::Conflict`] if the new email is taken
    async fn update(&self, user: &User) -> Result<i32, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;

    async fn exists(&self, id: i64) -> Result<bool, AppError>;

    async fn list(&self, filter: UserFilter, query: ListQuery)
    -> Result<(Vec<User>, i64), AppError>;
}
