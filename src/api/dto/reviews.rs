//! DTOs for review endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::ListParams;
use crate::domain::entities::{NewReview, Review, ReviewFilter, ReviewPatch};
use crate::domain::listing::PageMetadata;

/// Sort values accepted by `GET /v1/reviews`.
pub const REVIEW_SORT_SAFELIST: &[&str] = &[
    "id",
    "author",
    "rating",
    "helpful_count",
    "created_at",
    "-id",
    "-author",
    "-rating",
    "-helpful_count",
    "-created_at",
];

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub product_id: i64,

    #[validate(length(min = 1, max = 25, message = "must be between 1 and 25 characters long"))]
    pub author: String,

    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 1, max = 2000, message = "must be provided"))]
    pub comment: String,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(req: CreateReviewRequest) -> Self {
        NewReview {
            product_id: req.product_id,
            author: req.author,
            rating: req.rating,
            comment: req.comment,
        }
    }
}

/// Partial review update; see `UpdateProductRequest` for `version`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, max = 25, message = "must be between 1 and 25 characters long"))]
    pub author: Option<String>,

    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: Option<i32>,

    #[validate(length(min = 1, max = 2000, message = "must be provided"))]
    pub comment: Option<String>,

    pub version: Option<i32>,
}

impl UpdateReviewRequest {
    pub fn into_parts(self) -> (ReviewPatch, Option<i32>) {
        (
            ReviewPatch {
                author: self.author,
                rating: self.rating,
                comment: self.comment,
            },
            self.version,
        )
    }
}

/// `GET /v1/reviews` query.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewListQuery {
    #[serde(default)]
    pub author: String,
    #[serde(flatten)]
    pub list: ListParams,
}

impl ReviewListQuery {
    pub fn filter(&self) -> ReviewFilter {
        ReviewFilter {
            author: self.author.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewItem {
    pub id: i64,
    pub product_id: i64,
    pub author: String,
    pub rating: i32,
    pub comment: String,
    pub helpful_count: i32,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

impl From<Review> for ReviewItem {
    fn from(r: Review) -> Self {
        ReviewItem {
            id: r.id,
            product_id: r.product_id,
            author: r.author,
            rating: r.rating,
            comment: r.comment,
            helpful_count: r.helpful_count,
            created_at: r.created_at,
            version: r.version,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review: ReviewItem,
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewItem>,
    #[serde(rename = "@metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
}
