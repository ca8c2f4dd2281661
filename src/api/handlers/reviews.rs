//! Handlers for review endpoints.

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

use crate::api::dto::reviews::{
    CreateReviewRequest, REVIEW_SORT_SAFELIST, ReviewItem, ReviewListQuery, ReviewListResponse,
    ReviewResponse, UpdateReviewRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// # Endpoint
///
/// `GET /v1/reviews?author=&page=&page_size=&sort=`
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    query: Result<Query<ReviewListQuery>, QueryRejection>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let Query(params) = query?;
    let list_query = params.list.resolve("id", REVIEW_SORT_SAFELIST)?;

    let (reviews, metadata) = state
        .review_service
        .list(params.filter(), list_query)
        .await?;

    Ok(Json(ReviewListResponse {
        reviews: reviews.into_iter().map(ReviewItem::from).collect(),
        metadata: Some(metadata),
    }))
}

/// Creates a review for an existing product.
///
/// # Endpoint
///
/// `POST /v1/reviews` (activated user)
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn create_review_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let review = state.review_service.create(payload.into()).await?;
    let location = format!("/v1/reviews/{}", review.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ReviewResponse {
            review: review.into(),
        }),
    ))
}

/// # Endpoint
///
/// `GET /v1/reviews/{id}`
pub async fn show_review_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ReviewResponse>, AppError> {
    let Path(id) = id?;
    let review = state.review_service.get(id).await?;

    Ok(Json(ReviewResponse {
        review: review.into(),
    }))
}

/// # Endpoint
///
/// `PATCH /v1/reviews/{id}` (activated user)
pub async fn update_review_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let (patch, expected_version) = payload.into_parts();
    let review = state
        .review_service
        .update(id, patch, expected_version)
        .await?;

    Ok(Json(ReviewResponse {
        review: review.into(),
    }))
}

/// Adds one helpful vote.
///
/// # Endpoint
///
/// `PATCH /v1/reviews/{id}/helpful` (activated user)
pub async fn mark_review_helpful_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ReviewResponse>, AppError> {
    let Path(id) = id?;
    let review = state.review_service.mark_helpful(id).await?;

    Ok(Json(ReviewResponse {
        review: review.into(),
    }))
}

/// # Endpoint
///
/// `DELETE /v1/reviews/{id}` (activated user)
pub async fn delete_review_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.review_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All reviews of one product, oldest first.
///
/// # Endpoint
///
/// `GET /v1/products/{id}/reviews`
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn list_product_reviews_handler(
    State(state): State<AppState>,
    product_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let Path(product_id) = product_id?;
    let reviews = state.review_service.list_for_product(product_id).await?;

    Ok(Json(ReviewListResponse {
        reviews: reviews.into_iter().map(ReviewItem::from).collect(),
        metadata: None,
    }))
}

/// A review, only if it belongs to the given product.
///
/// # Endpoint
///
/// `GET /v1/products/{product_id}/reviews/{review_id}`
pub async fn show_product_review_handler(
    State(state): State<AppState>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<ReviewResponse>, AppError> {
    let Path((product_id, review_id)) = ids?;
    let review = state
        .review_service
        .get_for_product(review_id, product_id)
        .await?;

    Ok(Json(ReviewResponse {
        review: review.into(),
    }))
}
