//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and outbound mail.
//!
//! # Modules
//!
//! - [`mailer`] - Mail delivery abstraction and the logging implementation
//! - [`persistence`] - PostgreSQL repository implementations

pub mod mailer;
pub mod persistence;
