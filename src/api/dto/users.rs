//! DTOs for user and token endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::User;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 500, message = "must be between 1 and 500 characters long"))]
    pub username: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "must be between 8 and 72 characters long"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ActivateUserRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AuthenticationRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 72, message = "must be provided"))]
    pub password: String,
}

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserItem {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub activated: bool,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

impl From<User> for UserItem {
    fn from(u: User) -> Self {
        UserItem {
            id: u.id,
            username: u.username,
            email: u.email,
            activated: u.activated,
            created_at: u.created_at,
            version: u.version,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserItem,
}

#[derive(Debug, Serialize)]
pub struct TokenItem {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AuthenticationTokenResponse {
    pub authentication_token: TokenItem,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_validation() {
        let ok: RegisterUserRequest = serde_json::from_value(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "pa55word-long"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: RegisterUserRequest = serde_json::from_value(json!({
            "username": "",
            "email": "not-an-email",
            "password": "short"
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_user_item_omits_password_hash() {
        let body = serde_json::to_value(UserItem::from(User {
            id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            activated: true,
            created_at: Utc::now(),
            version: 1,
        }))
        .unwrap();
        assert!(body.get("password_hash").is_none());
        assert!(!body.to_string().contains("argon2id"));
    }
}
