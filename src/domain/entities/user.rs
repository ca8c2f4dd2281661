//! User entity.

use chrono::{DateTime, Utc};

/// A registered account.
///
/// `password_hash` holds an Argon2id PHC string and is never serialized.
#[derive(Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub activated: bool,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("activated", &self.activated)
            .field("created_at", &self.created_at)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Input data for registering a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Free-text filter on the username. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub username: String,
}
