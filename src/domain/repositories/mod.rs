//! Repository trait definitions for the domain layer.
//!
//! Products, reviews and users share one mutation protocol:
//!
//! - `insert` assigns id, `created_at` and `version = 1` in the same write
//! - `fetch` rejects ids below 1 as not found without touching the store
//! - `update` writes the whole row and bumps `version` by exactly one, but only
//!   if the stored version still equals the version carried by the entity;
//!   otherwise it reports [`crate::error::AppError::EditConflict`]
//! - `delete` reports [`crate::error::AppError::NotFound`] when no row was removed
//! - `exists` probes without materializing the row
//! - `list` returns one page of rows plus the total match count from a single query
//!
//! Every call is bounded by a short timeout; expiry surfaces as
//! [`crate::error::AppError::Unavailable`] and is never retried here.
//!
//! # Available Repositories
//!
//! - [`ProductRepository`] - Catalog products
//! - [`ReviewRepository`] - Product reviews
//! - [`UserRepository`] - Accounts
//! - [`TokenRepository`] - Activation and authentication token digests
//!
//! Implementations live in `crate::infrastructure::persistence`; mocks are
//! generated with `mockall` for unit tests.

pub mod product_repository;
pub mod review_repository;
pub mod token_repository;
pub mod user_repository;

pub use product_repository::ProductRepository;
pub use review_repository::ReviewRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
