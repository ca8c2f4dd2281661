//! DTOs for product endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::ListParams;
use crate::domain::entities::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::domain::listing::PageMetadata;

/// Sort values accepted by `GET /v1/products`.
pub const PRODUCT_SORT_SAFELIST: &[&str] = &[
    "id",
    "name",
    "category",
    "avg_rating",
    "created_at",
    "-id",
    "-name",
    "-category",
    "-avg_rating",
    "-created_at",
];

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters long"))]
    pub name: String,

    #[validate(length(min = 1, max = 500, message = "must be between 1 and 500 characters long"))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "must be provided"))]
    pub category: String,

    #[validate(url(message = "must be a valid URL"))]
    #[validate(length(max = 255, message = "must not be more than 255 characters long"))]
    pub image_url: String,

    #[validate(length(max = 10, message = "must not be more than 10 characters long"))]
    #[serde(default)]
    pub price: String,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name,
            description: req.description,
            category: req.category,
            image_url: req.image_url,
            price: req.price,
        }
    }
}

/// Partial product update. Omitted fields keep their stored value.
///
/// `version`, when present, must equal the stored version or the update is
/// rejected with `409 Conflict`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters long"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 500, message = "must be between 1 and 500 characters long"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "must be provided"))]
    pub category: Option<String>,

    #[validate(url(message = "must be a valid URL"))]
    #[validate(length(max = 255, message = "must not be more than 255 characters long"))]
    pub image_url: Option<String>,

    #[validate(length(max = 10, message = "must not be more than 10 characters long"))]
    pub price: Option<String>,

    pub version: Option<i32>,
}

impl UpdateProductRequest {
    /// Splits the request into the field patch and the expected version.
    pub fn into_parts(self) -> (ProductPatch, Option<i32>) {
        (
            ProductPatch {
                name: self.name,
                description: self.description,
                category: self.category,
                image_url: self.image_url,
                price: self.price,
            },
            self.version,
        )
    }
}

/// `GET /v1/products` query: free-text filters plus paging.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(flatten)]
    pub list: ListParams,
}

impl ProductListQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            name: self.name.clone(),
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub price: String,
    pub avg_rating: f32,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

impl From<Product> for ProductItem {
    fn from(p: Product) -> Self {
        ProductItem {
            id: p.id,
            name: p.name,
            description: p.description,
            category: p.category,
            image_url: p.image_url,
            price: p.price,
            avg_rating: p.avg_rating,
            created_at: p.created_at,
            version: p.version,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: ProductItem,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductItem>,
    #[serde(rename = "@metadata")]
    pub metadata: PageMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> serde_json::Value {
        json!({
            "name": "Kettle",
            "description": "Boils water",
            "category": "kitchen",
            "image_url": "https://img.example.com/kettle.png",
            "price": "29.99"
        })
    }

    #[test]
    fn test_valid_create_request() {
        let req: CreateProductRequest = serde_json::from_value(valid()).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_field_limits() {
        let mut body = valid();
        body["name"] = json!("x".repeat(101));
        body["image_url"] = json!("not a url");
        body["price"] = json!("12345678901");

        let req: CreateProductRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("image_url"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_update_request_splits_version() {
        let req: UpdateProductRequest =
            serde_json::from_value(json!({ "name": "Teapot", "version": 4 })).unwrap();
        assert!(req.validate().is_ok());

        let (patch, version) = req.into_parts();
        assert_eq!(patch.name.as_deref(), Some("Teapot"));
        assert!(patch.category.is_none());
        assert_eq!(version, Some(4));
    }

    #[test]
    fn test_list_response_envelope() {
        let body = serde_json::to_value(ProductListResponse {
            products: vec![],
            metadata: PageMetadata::default(),
        })
        .unwrap();
        assert_eq!(body, json!({ "products": [], "@metadata": {} }));
    }
}
