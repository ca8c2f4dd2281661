//! Helpers shared across layers.
//!
//! - [`password`] - Argon2id hashing and verification

pub mod password;
