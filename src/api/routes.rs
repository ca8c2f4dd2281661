//! API route configuration.
//!
//! Reads are public. Writes and account lookups require an activated user,
//! enforced by [`crate::api::middleware::auth::require_activated_user`].

use crate::api::handlers::{
    activate_user_handler, create_authentication_token_handler, create_product_handler,
    create_review_handler, delete_product_handler, delete_review_handler, health_handler,
    list_product_reviews_handler, list_products_handler, list_reviews_handler,
    mark_review_helpful_handler, register_user_handler, show_product_handler,
    show_product_review_handler, show_review_handler, show_user_handler, update_product_handler,
    update_review_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

/// Routes open to anonymous callers.
///
/// # Endpoints
///
/// - `GET  /healthcheck`                  - Database and background task status
/// - `GET  /products`                     - List products (filter, sort, paginate)
/// - `GET  /products/{id}`                - Show a product
/// - `GET  /products/{id}/reviews`        - All reviews of a product
/// - `GET  /products/{pid}/reviews/{rid}` - One review of a product
/// - `GET  /reviews`                      - List reviews (filter, sort, paginate)
/// - `GET  /reviews/{id}`                 - Show a review
/// - `POST /users`                        - Register an account
/// - `PUT  /users/activated`              - Activate an account
/// - `POST /tokens/authentication`        - Mint an authentication token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(health_handler))
        .route("/products", get(list_products_handler))
        .route("/products/{id}", get(show_product_handler))
        .route("/products/{id}/reviews", get(list_product_reviews_handler))
        .route(
            "/products/{product_id}/reviews/{review_id}",
            get(show_product_review_handler),
        )
        .route("/reviews", get(list_reviews_handler))
        .route("/reviews/{id}", get(show_review_handler))
        .route("/users", post(register_user_handler))
        .route("/users/activated", put(activate_user_handler))
        .route(
            "/tokens/authentication",
            post(create_authentication_token_handler),
        )
}

/// Routes that need an activated account.
///
/// # Endpoints
///
/// - `POST   /products`             - Create a product
/// - `PATCH  /products/{id}`        - Update a product
/// - `DELETE /products/{id}`        - Delete a product
/// - `POST   /reviews`              - Create a review
/// - `PATCH  /reviews/{id}`         - Update a review
/// - `DELETE /reviews/{id}`         - Delete a review
/// - `PATCH  /reviews/{id}/helpful` - Add a helpful vote
/// - `GET    /users/{id}`           - Show an account
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product_handler))
        .route(
            "/products/{id}",
            patch(update_product_handler).delete(delete_product_handler),
        )
        .route("/reviews", post(create_review_handler))
        .route(
            "/reviews/{id}",
            patch(update_review_handler).delete(delete_review_handler),
        )
        .route("/reviews/{id}/helpful", patch(mark_review_helpful_handler))
        .route("/users/{id}", get(show_user_handler))
        .route_layer(middleware::from_fn(auth::require_activated_user))
}

/// Public and protected routes with caller identity resolved on every request.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .layer(middleware::from_fn_with_state(state, auth::authenticate))
}
