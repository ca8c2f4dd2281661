//! Business logic services for the application layer.

pub mod product_service;
pub mod review_service;
pub mod token_service;
pub mod user_service;
pub mod versioning;

pub use product_service::ProductService;
pub use review_service::ReviewService;
pub use token_service::{TokenHasher, TokenService};
pub use user_service::{TokenTtls, UserService};
