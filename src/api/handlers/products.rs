//! Handlers for product endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::api::dto::products::{
    CreateProductRequest, PRODUCT_SORT_SAFELIST, ProductItem, ProductListQuery,
    ProductListResponse, ProductResponse, UpdateProductRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists products with optional full-text filters.
///
/// # Endpoint
///
/// `GET /v1/products?name=&category=&page=&page_size=&sort=`
///
/// # Errors
///
/// Returns 400 if `page`, `page_size` or `sort` is rejected.
pub async fn list_products_handler(
    State(state): State<AppState>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<Json<ProductListResponse>, AppError> {
    let Query(params) = query?;
    let list_query = params.list.resolve("id", PRODUCT_SORT_SAFELIST)?;

    let (products, metadata) = state
        .product_service
        .list(params.filter(), list_query)
        .await?;

    Ok(Json(ProductListResponse {
        products: products.into_iter().map(ProductItem::from).collect(),
        metadata,
    }))
}

/// Creates a product.
///
/// # Endpoint
///
/// `POST /v1/products` (activated user)
///
/// Responds `201 Created` with a `Location` header.
pub async fn create_product_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let product = state.product_service.create(payload.into()).await?;
    let location = format!("/v1/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse {
            product: product.into(),
        }),
    ))
}

/// # Endpoint
///
/// `GET /v1/products/{id}`
pub async fn show_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let Path(id) = id?;
    let product = state.product_service.get(id).await?;

    Ok(Json(ProductResponse {
        product: product.into(),
    }))
}

/// Partially updates a product.
///
/// # Endpoint
///
/// `PATCH /v1/products/{id}` (activated user)
///
/// # Errors
///
/// Returns 404 if the product does not exist and 409 if `version` is stale or
/// a concurrent update won.
pub async fn update_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let (patch, expected_version) = payload.into_parts();
    let product = state
        .product_service
        .update(id, patch, expected_version)
        .await?;

    Ok(Json(ProductResponse {
        product: product.into(),
    }))
}

/// Deletes a product and its reviews.
///
/// # Endpoint
///
/// `DELETE /v1/products/{id}` (activated user)
pub async fn delete_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.product_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
