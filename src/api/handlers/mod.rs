//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod products;
pub mod reviews;
pub mod tokens;
pub mod users;

pub use health::health_handler;
pub use products::{
    create_product_handler, delete_product_handler, list_products_handler, show_product_handler,
    update_product_handler,
};
pub use reviews::{
    create_review_handler, delete_review_handler, list_product_reviews_handler,
    list_reviews_handler, mark_review_helpful_handler, show_product_review_handler,
    show_review_handler, update_review_handler,
};
pub use tokens::create_authentication_token_handler;
pub use users::{activate_user_handler, register_user_handler, show_user_handler};
