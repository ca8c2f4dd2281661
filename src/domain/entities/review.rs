//! Review entity.

use chrono::{DateTime, Utc};

/// A rating and comment left on a product.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub author: String,
    pub rating: i32,
    pub comment: String,
    pub helpful_count: i32,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

/// Input data for creating a review.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub product_id: i64,
    pub author: String,
    pub rating: i32,
    pub comment: String,
}

/// Free-text filter on the review author. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub author: String,
}

/// Partial update for an existing review.
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub author: Option<String>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

impl Review {
    pub fn apply(&mut self, patch: ReviewPatch) {
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(comment) = patch.comment {
            self.comment = comment;
        }
    }
}
