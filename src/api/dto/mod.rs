//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Responses wrap their payload in a named envelope
//! (`{"product": ...}`, `{"products": [...], "@metadata": {...}}`).

pub mod health;
pub mod pagination;
pub mod products;
pub mod reviews;
pub mod users;
