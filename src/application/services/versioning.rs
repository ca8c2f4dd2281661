//! Optimistic-concurrency guard shared by the record services.

use serde_json::json;

use crate::domain::entities::Versioned;
use crate::error::AppError;

/// Compares the version a client sent with the version just read.
///
/// `None` skips the check; the store still guards the write with the version
/// that was read.
pub fn ensure_version<E: Versioned>(entity: &E, expected: Option<i32>) -> Result<(), AppError> {
    match expected {
        Some(v) if v != entity.version() => Err(AppError::edit_conflict(json!({
            "id": entity.id(),
            "expected_version": v,
            "current_version": entity.version(),
        }))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Product;
    use chrono::Utc;

    fn product(version: i32) -> Product {
        Product {
            id: 3,
            name: "Lamp".to_string(),
            description: String::new(),
            category: "home".to_string(),
            image_url: String::new(),
            price: "12.00".to_string(),
            avg_rating: 0.0,
            created_at: Utc::now(),
            version,
        }
    }

    #[test]
    fn test_missing_expectation_passes() {
        assert!(ensure_version(&product(4), None).is_ok());
    }

    #[test]
    fn test_matching_expectation_passes() {
        assert!(ensure_version(&product(4), Some(4)).is_ok());
    }

    #[test]
    fn test_stale_expectation_is_edit_conflict() {
        let err = ensure_version(&product(4), Some(3)).unwrap_err();
        assert!(matches!(err, AppError::EditConflict { .. }));
    }
}
