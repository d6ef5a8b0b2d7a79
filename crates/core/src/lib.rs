//! Lifeplan Core - Domain entities, services, and traits.
//!
//! This crate contains the business rules for goals, daily schedules and
//! user accounts. It is database-agnostic and defines repository traits
//! that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod schedules;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
