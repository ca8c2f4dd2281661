//! Product entity.

use chrono::{DateTime, Utc};

/// A catalog product.
///
/// `avg_rating` is derived from the product's reviews by the store and is
/// never written through [`crate::domain::repositories::ProductRepository::update`].
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub price: String,
    pub avg_rating: f32,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

/// Input data for creating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub price: String,
}

/// Free-text filters for product listings. Empty strings match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: String,
    pub category: String,
}

/// Partial update for an existing product. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
}

impl Product {
    /// Merges `patch` into this product in place.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}
