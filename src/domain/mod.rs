//! Domain layer containing business entities and the core request mechanics.
//!
//! # Architecture
//!
//! - [`entities`] - Products, reviews, users and tokens
//! - [`repositories`] - Data access trait definitions
//! - [`listing`] - Safelisted sorting and bounded pagination
//! - [`background`] - Tracked fire-and-forget tasks drained at shutdown
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by the infrastructure layer
//! - Business logic lives in services (see [`crate::application::services`])

pub mod background;
pub mod entities;
pub mod listing;
pub mod repositories;
