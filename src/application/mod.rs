//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! give HTTP handlers a narrow API. They depend on repository traits only.
//!
//! # Available Services
//!
//! - [`services::ProductService`] - Product catalog
//! - [`services::ReviewService`] - Reviews and helpful votes
//! - [`services::UserService`] - Registration, activation and login
//! - [`services::TokenService`] - Scoped bearer token lifecycle

pub mod services;
